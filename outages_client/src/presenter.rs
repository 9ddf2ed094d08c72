use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use water_outages::contracts::fetch_outages::{FetchError, OutageSource};
use water_outages::filter;
use water_outages::outage::Outage;

use crate::view;

pub const LOADING_MESSAGE: &str = "Veriler yükleniyor...";
pub const NO_MATCHES_MESSAGE: &str = "Bu filtreyle eşleşen kesinti bulunamadı.";
pub const ERROR_MESSAGE: &str = "Veriler yüklenemedi.\nİnternet bağlantınızı kontrol edin.";

/// Posted onto the UI loop by background work.
#[derive(Debug)]
pub enum UiMessage {
    OutagesFetched(Result<Vec<Outage>, FetchError>),
}

/// The display text of one outage, with placeholders already substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutageBlock {
    pub district: String,
    pub neighborhoods: String,
    pub duration: String,
    pub description: String,
}

impl From<&Outage> for OutageBlock {
    fn from(outage: &Outage) -> Self {
        Self {
            district: outage.district_label().to_string(),
            neighborhoods: outage.neighborhoods_label().to_string(),
            duration: outage.duration_label().to_string(),
            description: outage.description_label().to_string(),
        }
    }
}

/// What the output panel currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    Loading,
    Outages(Vec<OutageBlock>),
    NoMatches,
    Error,
}

/// One block per outage, in order, or the "no matches" placeholder for an empty list.
pub fn render(outages: &[&Outage]) -> Panel {
    if outages.is_empty() {
        return Panel::NoMatches;
    }
    Panel::Outages(
        outages
            .iter()
            .map(|outage| OutageBlock::from(*outage))
            .collect(),
    )
}

/// Inner size of the output panel, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Default for Viewport {
    /// Until the first resize every content line counts as one row.
    fn default() -> Self {
        Self {
            width: u16::MAX,
            height: 1,
        }
    }
}

/// Owns the fetched outages and decides what the panel shows.
///
/// Lives on the UI thread for the whole session. Background work talks to it only through
/// [`UiMessage`]s.
pub struct Presenter {
    full_list: Vec<Outage>,
    query: String,
    panel: Panel,
    scroll: u16,
    viewport: Viewport,
    _ui_thread: PhantomData<Rc<()>>,
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter {
    pub fn new() -> Self {
        Self {
            full_list: Vec::new(),
            query: String::new(),
            panel: Panel::Loading,
            scroll: 0,
            viewport: Viewport::default(),
            _ui_thread: PhantomData,
        }
    }

    pub fn full_list(&self) -> &[Outage] {
        &self.full_list
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Panel rows visible at once. Paging moves by this much.
    pub fn page_height(&self) -> u16 {
        self.viewport.height.max(1)
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.scroll = self.scroll.min(self.max_scroll());
    }

    /// Shows the loading indicator and starts the single fetch of the session.
    ///
    /// The outcome comes back through `sender`; the spawned task never touches the presenter.
    pub fn on_startup<S>(
        &mut self,
        source: Arc<S>,
        sender: UnboundedSender<UiMessage>,
    ) -> JoinHandle<()>
    where
        S: OutageSource + ?Sized + 'static,
    {
        self.show(Panel::Loading);
        tokio::spawn(async move {
            let outcome = source.fetch().await;
            if sender.send(UiMessage::OutagesFetched(outcome)).is_err() {
                debug!("UI loop closed before the outage list arrived");
            }
        })
    }

    pub fn handle(&mut self, message: UiMessage) {
        match message {
            UiMessage::OutagesFetched(Ok(outages)) => self.on_fetch_success(outages),
            UiMessage::OutagesFetched(Err(err)) => self.on_fetch_error(err),
        }
    }

    pub fn on_fetch_success(&mut self, outages: Vec<Outage>) {
        info!(count = outages.len(), "Outage list loaded");
        self.full_list = outages;
        self.render_current();
    }

    pub fn on_fetch_error(&mut self, err: FetchError) {
        error!(error = %err, details = ?err, "Failed to fetch outages");
        self.show(Panel::Error);
    }

    pub fn on_query_changed(&mut self, query: String) {
        self.query = query;
        self.render_current();
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_home(&mut self) {
        self.scroll = 0;
    }

    /// Scrolling stops once the last wrapped row reaches the bottom of the panel.
    fn max_scroll(&self) -> u16 {
        let rows = view::content_height(&self.panel, self.viewport.width);
        let hidden = rows.saturating_sub(usize::from(self.page_height()));
        u16::try_from(hidden).unwrap_or(u16::MAX)
    }

    fn render_current(&mut self) {
        let panel = {
            let visible = filter::apply(&self.full_list, &self.query);
            render(&visible)
        };
        self.show(panel);
    }

    fn show(&mut self, panel: Panel) {
        self.panel = panel;
        self.scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::thread::{self, ThreadId};

    use async_trait::async_trait;
    use httpmock::{Method::GET, MockServer};
    use serde_json::json;
    use tokio::sync::mpsc;
    use url::Url;
    use water_outages::config::OutagesSettings;
    use water_outages::contracts::fetch_outages::{FetchError, OutageSource, OutagesFetcher};
    use water_outages::outage::Outage;

    use super::{OutageBlock, Panel, Presenter, UiMessage, Viewport};

    const PATH: &str = "/SuKesintileri/suKesintileriGetirJS";

    struct StubSource {
        outages: Vec<Outage>,
        fetched_on: Mutex<Option<ThreadId>>,
    }

    impl StubSource {
        fn new(outages: Vec<Outage>) -> Self {
            Self {
                outages,
                fetched_on: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl OutageSource for StubSource {
        async fn fetch(&self) -> Result<Vec<Outage>, FetchError> {
            *self.fetched_on.lock().unwrap() = Some(thread::current().id());
            Ok(self.outages.clone())
        }
    }

    fn outages() -> Vec<Outage> {
        vec![
            Outage::new("Karşıyaka", "Bostanlı", "08:00-18:00", "Bakım"),
            Outage::new("Bornova", "Erzene, Kazımdirik", "10:00-14:00", "Arıza"),
            Outage::new("Konak", "Alsancak", "13:00-17:00", "Hat yenileme"),
        ]
    }

    fn districts(panel: &Panel) -> Vec<&str> {
        match panel {
            Panel::Outages(blocks) => blocks.iter().map(|block| block.district.as_str()).collect(),
            other => panic!("expected outages, got {other:?}"),
        }
    }

    async fn load_from(server: &MockServer, timeout_seconds: u64) -> Presenter {
        let fetcher = OutagesFetcher::new(&OutagesSettings {
            endpoint: server.url(PATH),
            timeout_seconds,
        })
        .unwrap();
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let mut presenter = Presenter::new();
        presenter.on_startup(Arc::new(fetcher), sender);
        assert_eq!(presenter.panel(), &Panel::Loading);

        let message = receiver.recv().await.unwrap();
        presenter.handle(message);
        presenter
    }

    #[tokio::test]
    async fn test_successful_fetch_renders_one_block_per_outage() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(PATH);
                then.status(200).json_body(json!([{
                    "IlceAdi": "Karşıyaka",
                    "Mahalleler": "Bostanlı",
                    "KesintiSuresi": "08:00-18:00",
                    "Aciklama": "Bakım"
                }]));
            })
            .await;

        let presenter = load_from(&server, 10).await;

        assert_eq!(
            presenter.panel(),
            &Panel::Outages(vec![OutageBlock {
                district: "Karşıyaka".to_string(),
                neighborhoods: "Bostanlı".to_string(),
                duration: "08:00-18:00".to_string(),
                description: "Bakım".to_string(),
            }])
        );
        assert_eq!(presenter.full_list().len(), 1);
    }

    #[tokio::test]
    async fn test_server_error_renders_the_error_message_and_keeps_the_list_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(PATH);
                then.status(500);
            })
            .await;

        let presenter = load_from(&server, 10).await;

        assert_eq!(presenter.panel(), &Panel::Error);
        assert!(presenter.full_list().is_empty());
    }

    #[tokio::test]
    async fn test_timeout_renders_the_error_message_and_keeps_the_list_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(PATH);
                then.status(200)
                    .json_body(json!([]))
                    .delay(std::time::Duration::from_secs(3));
            })
            .await;

        let presenter = load_from(&server, 1).await;

        assert_eq!(presenter.panel(), &Panel::Error);
        assert!(presenter.full_list().is_empty());
    }

    #[tokio::test]
    async fn test_missing_description_is_rendered_as_placeholder() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(PATH);
                then.status(200).json_body(json!([{
                    "IlceAdi": "Buca",
                    "Mahalleler": "Kaynaklar",
                    "KesintiSuresi": "09:00-12:00"
                }]));
            })
            .await;

        let presenter = load_from(&server, 10).await;

        match presenter.panel() {
            Panel::Outages(blocks) => assert_eq!(blocks[0].description, "N/A"),
            other => panic!("expected outages, got {other:?}"),
        }
    }

    #[test]
    fn test_query_changes_filter_the_full_list() {
        let mut presenter = Presenter::new();
        presenter.on_fetch_success(outages());

        presenter.on_query_changed("KAZ".to_string());
        assert_eq!(districts(presenter.panel()), vec!["Bornova"]);

        presenter.on_query_changed(String::new());
        assert_eq!(districts(presenter.panel()), vec!["Karşıyaka", "Bornova", "Konak"]);
        assert_eq!(presenter.full_list().len(), 3);
    }

    #[test]
    fn test_no_matches_renders_the_placeholder() {
        let mut presenter = Presenter::new();
        presenter.on_fetch_success(outages());

        presenter.on_query_changed("Çiğli".to_string());

        assert_eq!(presenter.panel(), &Panel::NoMatches);
    }

    #[test]
    fn test_search_stays_usable_after_a_fetch_error() {
        let mut presenter = Presenter::new();
        presenter.on_fetch_error(FetchError::Timeout {
            url: Url::parse("https://www.izsu.gov.tr/SuKesintileri/suKesintileriGetirJS").unwrap(),
        });
        assert_eq!(presenter.panel(), &Panel::Error);

        presenter.on_query_changed("b".to_string());

        assert_eq!(presenter.panel(), &Panel::NoMatches);
        assert!(presenter.full_list().is_empty());
    }

    #[test]
    fn test_outages_arriving_after_typing_respect_the_query() {
        let mut presenter = Presenter::new();
        presenter.on_query_changed("konak".to_string());
        assert_eq!(presenter.panel(), &Panel::NoMatches);

        presenter.on_fetch_success(outages());

        assert_eq!(districts(presenter.panel()), vec!["Konak"]);
        assert_eq!(presenter.full_list().len(), 3);
    }

    #[test]
    fn test_empty_fetch_renders_the_no_matches_placeholder() {
        let mut presenter = Presenter::new();
        presenter.on_fetch_success(vec![]);
        assert_eq!(presenter.panel(), &Panel::NoMatches);
    }

    #[test]
    fn test_scrolling_is_bounded_and_reset_by_rendering() {
        let mut presenter = Presenter::new();
        presenter.on_fetch_success(outages());

        presenter.scroll_down(4);
        assert_eq!(presenter.scroll(), 4);
        presenter.scroll_down(100);
        assert_eq!(presenter.scroll(), 14);
        presenter.scroll_up(10);
        assert_eq!(presenter.scroll(), 4);

        presenter.on_query_changed("bor".to_string());
        assert_eq!(presenter.scroll(), 0);
    }

    #[test]
    fn test_wrapped_rows_extend_the_scroll_range() {
        let long = "Alaybey, Bostanlı, Donanmacı, Mavişehir, Tuna, Yalı, Zübeyde Hanım";
        let mut presenter = Presenter::new();
        presenter.on_fetch_success(vec![
            Outage::new("Karşıyaka", long, "08:00-18:00", "Bakım"),
            Outage::new("Bornova", long, "10:00-14:00", "Arıza"),
            Outage::new("Konak", "Alsancak", "13:00-17:00", "Hat yenileme"),
        ]);
        presenter.resize(Viewport {
            width: 28,
            height: 3,
        });

        presenter.scroll_down(u16::MAX);

        // 15 unwrapped lines, and each long neighborhood list takes at least three rows.
        assert!(presenter.scroll() >= 16, "scroll stopped at {}", presenter.scroll());
    }

    #[test]
    fn test_shrinking_the_panel_keeps_scroll_in_range() {
        let mut presenter = Presenter::new();
        presenter.on_fetch_success(outages());
        presenter.scroll_down(u16::MAX);
        assert_eq!(presenter.scroll(), 14);

        presenter.resize(Viewport {
            width: 70,
            height: 10,
        });

        assert_eq!(presenter.scroll(), 5);
        assert_eq!(presenter.page_height(), 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_fetch_runs_off_the_ui_thread_and_rendering_stays_on_it() {
        let ui_thread = thread::current().id();
        let source = Arc::new(StubSource::new(outages()));
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let mut presenter = Presenter::new();

        let fetch = presenter.on_startup(Arc::clone(&source), sender);
        fetch.await.unwrap();
        assert_eq!(presenter.panel(), &Panel::Loading);

        let message = receiver.recv().await.unwrap();
        assert!(matches!(message, UiMessage::OutagesFetched(Ok(_))));
        presenter.handle(message);

        let fetched_on = *source.fetched_on.lock().unwrap();
        let fetched_on = fetched_on.expect("the stub to have been fetched");
        assert_ne!(fetched_on, ui_thread);
        assert_eq!(thread::current().id(), ui_thread);
        assert_eq!(districts(presenter.panel()).len(), 3);
    }
}
