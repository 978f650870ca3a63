//! Result display view.

use std::sync::Arc;

use super::state::{Load, ViewState};
use crate::api::SearchApi;
use crate::classify::{AccessBadge, LinkAction};
use crate::models::{SearchResult, Source};

/// Shown when a result could not be fetched
pub const RESULT_FAILED_MESSAGE: &str = "Could not load the search results.";

/// Where a result view gets its data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultSource {
    /// Already available; rendered without any request
    Provided(SearchResult),
    /// Fetched once, on mount
    ByIdentifier(i64),
}

/// One source, ready to display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCard {
    pub source: Source,
    pub badge: AccessBadge,
    /// `None` when the source has no link
    pub action: Option<LinkAction>,
}

impl SourceCard {
    pub fn new(source: &Source) -> Self {
        Self {
            badge: AccessBadge::classify(source.access_type.as_deref()),
            action: LinkAction::for_link(source.link.as_deref()),
            source: source.clone(),
        }
    }
}

/// What the result view shows; exactly one variant at a time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultRender {
    Loading,
    Error(String),
    /// The search succeeded but found nothing
    Empty { term: String, searched_at: String },
    /// One card per source, in the order the service returned them
    Sources {
        term: String,
        searched_at: String,
        cards: Vec<SourceCard>,
    },
}

impl ResultRender {
    /// Render an available result
    pub fn from_result(result: &SearchResult) -> Self {
        if result.sources.is_empty() {
            return ResultRender::Empty {
                term: result.term.clone(),
                searched_at: result.searched_at.clone(),
            };
        }

        ResultRender::Sources {
            term: result.term.clone(),
            searched_at: result.searched_at.clone(),
            cards: result.sources.iter().map(SourceCard::new).collect(),
        }
    }

    fn from_load(load: &Load<SearchResult>) -> Self {
        match load {
            Load::Idle | Load::Loading => ResultRender::Loading,
            Load::Failed(message) => ResultRender::Error(message.clone()),
            Load::Ready(result) => ResultRender::from_result(result),
        }
    }
}

enum Origin {
    Provided,
    Fetch { api: Arc<dyn SearchApi>, id: i64 },
}

/// Displays one search result, either handed in or fetched by id.
///
/// The data source is fixed at construction and never re-checked.
pub struct ResultView {
    origin: Origin,
    state: ViewState<SearchResult>,
}

impl std::fmt::Debug for ResultView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let origin = match &self.origin {
            Origin::Provided => "provided".to_string(),
            Origin::Fetch { id, .. } => format!("id {}", id),
        };
        f.debug_struct("ResultView")
            .field("origin", &origin)
            .field("state", &self.state)
            .finish()
    }
}

impl ResultView {
    pub fn new(source: ResultSource, api: Arc<dyn SearchApi>) -> Self {
        match source {
            ResultSource::Provided(result) => Self::provided(result),
            ResultSource::ByIdentifier(id) => Self::by_identifier(api, id),
        }
    }

    /// A view over a result that is already in hand
    pub fn provided(result: SearchResult) -> Self {
        Self {
            origin: Origin::Provided,
            state: ViewState::new(Load::Ready(result)),
        }
    }

    /// A view that fetches result `id` when mounted
    pub fn by_identifier(api: Arc<dyn SearchApi>, id: i64) -> Self {
        Self {
            origin: Origin::Fetch { api, id },
            state: ViewState::new(Load::Loading),
        }
    }

    /// Fetch the result if this view was built from an identifier.
    ///
    /// A provided result is already rendered; nothing is requested.
    pub async fn mount(&self) {
        let Origin::Fetch { api, id } = &self.origin else {
            return;
        };
        if !self.state.liveness().is_mounted() {
            return;
        }

        self.state.set(Load::Loading);
        let load = match api.get(*id).await {
            Ok(result) => Load::Ready(result),
            Err(e) => {
                tracing::warn!(id, error = %e, "failed to load search result");
                Load::Failed(RESULT_FAILED_MESSAGE.to_string())
            }
        };
        self.state.settle(load);
    }

    pub fn load(&self) -> Load<SearchResult> {
        self.state.snapshot()
    }

    /// The result, once available
    pub fn result(&self) -> Option<SearchResult> {
        self.state.with(|load| load.ready().cloned())
    }

    pub fn render(&self) -> ResultRender {
        self.state.with(ResultRender::from_load)
    }

    pub fn unmount(&self) {
        self.state.liveness().unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::make_result;
    use crate::api::{ApiCall, ApiError, MockSearchApi};
    use crate::classify::BadgeKind;
    use crate::models::SourceBuilder;

    #[tokio::test]
    async fn test_provided_result_renders_without_request() {
        let api = Arc::new(MockSearchApi::new());
        let result = make_result(1, "graph theory", &["Euler", "Kőnig"]);
        let view = ResultView::new(ResultSource::Provided(result.clone()), api.clone());

        assert!(matches!(view.render(), ResultRender::Sources { .. }));
        view.mount().await;

        assert_eq!(api.call_count(), 0);
        assert_eq!(view.result(), Some(result));
    }

    #[tokio::test]
    async fn test_fetch_by_identifier() {
        let api = Arc::new(MockSearchApi::new());
        api.set_get_response(Ok(make_result(9, "optics", &["Lens design"])));
        let view = ResultView::by_identifier(api.clone(), 9);

        assert_eq!(view.render(), ResultRender::Loading);
        view.mount().await;

        assert_eq!(api.calls(), vec![ApiCall::Get(9)]);
        match view.render() {
            ResultRender::Sources { term, cards, .. } => {
                assert_eq!(term, "optics");
                assert_eq!(cards.len(), 1);
                assert_eq!(cards[0].source.title, "Lens design");
            }
            other => panic!("unexpected render: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_shows_generic_error() {
        let api = Arc::new(MockSearchApi::new());
        api.set_get_response(Err(ApiError::Status {
            status: 404,
            body: None,
        }));
        let view = ResultView::by_identifier(api, 404);

        view.mount().await;

        assert_eq!(
            view.render(),
            ResultRender::Error(RESULT_FAILED_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let view = ResultView::provided(make_result(2, "nothing here", &[]));
        assert!(matches!(view.render(), ResultRender::Empty { ref term, .. } if term == "nothing here"));
    }

    #[test]
    fn test_cards_keep_server_order_and_classify() {
        let result = SearchResult::new(5, "ml", "2024-01-01T00:00:00Z").with_sources(vec![
            SourceBuilder::new(1, "Zeta")
                .link("paper.pdf")
                .access_type("PDF Article")
                .build(),
            SourceBuilder::new(2, "Alpha")
                .link("https://blog.example.com/post")
                .access_type("Blog")
                .build(),
            SourceBuilder::new(3, "Mid").build(),
        ]);

        let ResultRender::Sources { cards, .. } = ResultRender::from_result(&result) else {
            panic!("expected sources");
        };

        let titles: Vec<_> = cards.iter().map(|c| c.source.title.as_str()).collect();
        assert_eq!(titles, vec!["Zeta", "Alpha", "Mid"]);

        assert_eq!(cards[0].badge.kind, BadgeKind::Pdf);
        assert_eq!(cards[0].action, Some(LinkAction::Download));
        assert_eq!(cards[1].badge.kind, BadgeKind::WebText);
        assert_eq!(cards[1].action, Some(LinkAction::Open));
        assert_eq!(cards[2].badge.kind, BadgeKind::Unspecified);
        assert_eq!(cards[2].action, None);
    }

    #[tokio::test]
    async fn test_unmount_discards_late_result() {
        let api = Arc::new(MockSearchApi::new());
        api.set_get_response(Ok(make_result(3, "late", &["L"])));
        api.hold_responses();
        let view = Arc::new(ResultView::by_identifier(api.clone(), 3));

        let task = tokio::spawn({
            let view = view.clone();
            async move { view.mount().await }
        });
        while api.call_count() == 0 {
            tokio::task::yield_now().await;
        }

        view.unmount();
        api.release();
        task.await.unwrap();

        assert_eq!(view.render(), ResultRender::Loading);
    }
}
