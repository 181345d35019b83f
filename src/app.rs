use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;

use crate::action::{Action, InputMode};
use crate::detail::{self, DetailView};
use crate::error::FolioError;
use crate::event::Event;
use crate::forge::Forge;
use crate::listing::{self, FetchTicket, Listing};
use crate::modal::{CreateForm, DeleteConfirm, Modal, UpdateForm};
use crate::route::Route;
use crate::types::{NewRepo, RepositoryRef};

const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,     // Search + paginated repositories
    Detail,   // One repository
    NotFound, // Unknown route
    Fault,    // Recovered from a panic; reload only
}

/// Transient status-bar message
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
    expires_at: Instant,
}

pub struct App {
    pub screen: Screen,
    pub listing: Listing,
    pub selected: usize,
    pub detail: Option<DetailView>,
    pub modal: Option<Modal>,
    pub input_mode: InputMode,
    pub command_input: String,
    pub not_found_path: String,
    pub fault: Option<String>,
    pub notice: Option<Notice>,
    pub should_quit: bool,
    listing_started: bool,
    forge: Arc<dyn Forge>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(forge: Arc<dyn Forge>, action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            screen: Screen::List,
            listing: Listing::new(),
            selected: 0,
            detail: None,
            modal: None,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            not_found_path: String::new(),
            fault: None,
            notice: None,
            should_quit: false,
            listing_started: false,
            forge,
            action_tx,
        }
    }

    pub fn account(&self) -> &str {
        self.forge.account()
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Tick => Action::Tick,
            Event::Key(key) => self.handle_key(key),
            Event::Render => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if self.screen == Screen::Fault {
            return match key.code {
                KeyCode::Char('r') | KeyCode::Enter => Action::Reload,
                KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
                _ => Action::None,
            };
        }

        if let Some(modal) = &self.modal {
            return match modal {
                Modal::Delete(_) => match key.code {
                    KeyCode::Char('y') | KeyCode::Enter => Action::ModalSubmit,
                    KeyCode::Char('n') | KeyCode::Esc => Action::ModalCancel,
                    _ => Action::None,
                },
                Modal::Create(_) | Modal::Update(_) => match key.code {
                    KeyCode::Esc => Action::ModalCancel,
                    KeyCode::Enter => Action::ModalSubmit,
                    KeyCode::Tab | KeyCode::BackTab => Action::ModalNextField,
                    KeyCode::Backspace => Action::ModalBackspace,
                    KeyCode::Char(c) => Action::ModalInput(c),
                    _ => Action::None,
                },
            };
        }

        match self.input_mode {
            InputMode::Search => {
                return match key.code {
                    KeyCode::Esc | KeyCode::Enter => Action::ExitSearchMode,
                    KeyCode::Backspace => Action::SearchBackspace,
                    KeyCode::Char(c) => Action::SearchInput(c),
                    _ => Action::None,
                }
            }
            InputMode::Command => {
                return match key.code {
                    KeyCode::Esc => Action::ExitCommandMode,
                    KeyCode::Enter => Action::CommandConfirm,
                    KeyCode::Backspace => Action::CommandBackspace,
                    KeyCode::Char(c) => Action::CommandInput(c),
                    _ => Action::None,
                }
            }
            InputMode::Normal => {}
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.screen == Screen::List {
                    Action::Quit
                } else {
                    Action::Back
                }
            }
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char(':') => Action::EnterCommandMode,
            KeyCode::Enter => match self.screen {
                Screen::NotFound => Action::Navigate(Route::List),
                _ => Action::Select,
            },
            KeyCode::Char('r') => Action::Refresh,
            _ => match self.screen {
                Screen::List => match key.code {
                    KeyCode::Char('/') => Action::EnterSearchMode,
                    KeyCode::Char('l') | KeyCode::Char('n') | KeyCode::Right => Action::NextPage,
                    KeyCode::Char('h') | KeyCode::Char('p') | KeyCode::Left => Action::PrevPage,
                    KeyCode::Char('c') => Action::ShowCreate,
                    KeyCode::Char('x') => Action::ClearSearch,
                    KeyCode::Char('o') => Action::OpenProfile,
                    KeyCode::Char('!') => Action::TriggerFault,
                    _ => Action::None,
                },
                Screen::Detail => match key.code {
                    KeyCode::Char('u') => Action::ShowUpdate,
                    KeyCode::Char('d') => Action::ShowDelete,
                    KeyCode::Char('o') => Action::OpenInBrowser,
                    KeyCode::Char('y') => Action::YankUrl,
                    KeyCode::Char('h') | KeyCode::Left => Action::Back,
                    _ => Action::None,
                },
                Screen::NotFound => match key.code {
                    KeyCode::Char('h') => Action::Navigate(Route::List),
                    _ => Action::None,
                },
                Screen::Fault => Action::None,
            },
        }
    }

    pub fn update(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Back => match self.screen {
                Screen::List => {
                    self.should_quit = true;
                }
                Screen::Detail => self.back_to_list(),
                Screen::NotFound => self.navigate(Route::List),
                Screen::Fault => {}
            },
            Action::Tick => {
                if self
                    .notice
                    .as_ref()
                    .is_some_and(|n| Instant::now() >= n.expires_at)
                {
                    self.notice = None;
                }
            }
            Action::ScrollUp => match self.screen {
                Screen::List => {
                    self.selected = self.selected.saturating_sub(1);
                }
                Screen::Detail => {
                    if let Some(view) = &mut self.detail {
                        view.scroll_offset = view.scroll_offset.saturating_sub(1);
                    }
                }
                Screen::NotFound | Screen::Fault => {}
            },
            Action::ScrollDown => match self.screen {
                Screen::List => {
                    let len = self.listing.items().len();
                    if len > 0 && self.selected < len - 1 {
                        self.selected += 1;
                    }
                }
                Screen::Detail => {
                    if let Some(view) = &mut self.detail {
                        view.scroll_offset += 1;
                    }
                }
                Screen::NotFound | Screen::Fault => {}
            },
            Action::Select => {
                if self.screen == Screen::List {
                    if let Some(item) = self.listing.items().get(self.selected) {
                        self.detail = Some(DetailView::seeded(item));
                        self.screen = Screen::Detail;
                    }
                }
            }

            // Navigation
            Action::Navigate(route) => self.navigate(route),
            Action::Reload => self.reload(),
            Action::OpenProfile => {
                if let Err(e) = open::that(self.forge.profile_url()) {
                    self.update(FolioError::Io(e).into());
                }
            }
            Action::TriggerFault => {
                panic!("test fault raised from the repository list");
            }

            // Listing
            Action::NextPage => {
                if self.screen == Screen::List {
                    let ticket = self.listing.next_page();
                    self.spawn_fetch(ticket);
                }
            }
            Action::PrevPage => {
                if self.screen == Screen::List {
                    if let Some(ticket) = self.listing.prev_page() {
                        self.spawn_fetch(ticket);
                    }
                }
            }
            Action::Refresh => match self.screen {
                Screen::List => {
                    let ticket = self.listing.begin_fetch();
                    self.spawn_fetch(ticket);
                }
                Screen::Detail => self.refresh_detail(),
                Screen::NotFound | Screen::Fault => {}
            },
            Action::ListingLoaded {
                generation,
                outcome,
            } => {
                if self.listing.apply(generation, outcome) {
                    self.selected = 0;
                }
            }

            // Search
            Action::EnterSearchMode => {
                self.input_mode = InputMode::Search;
            }
            Action::ExitSearchMode => {
                self.input_mode = InputMode::Normal;
            }
            Action::SearchInput(c) => {
                let mut term = self.listing.search_term().to_string();
                term.push(c);
                self.search(term);
            }
            Action::SearchBackspace => {
                let mut term = self.listing.search_term().to_string();
                if term.pop().is_some() {
                    self.search(term);
                }
            }
            Action::ClearSearch => {
                if !self.listing.search_term().is_empty() {
                    self.search(String::new());
                }
            }

            // Path prompt
            Action::EnterCommandMode => {
                self.command_input.clear();
                self.input_mode = InputMode::Command;
            }
            Action::ExitCommandMode => {
                self.input_mode = InputMode::Normal;
            }
            Action::CommandInput(c) => {
                self.command_input.push(c);
            }
            Action::CommandBackspace => {
                self.command_input.pop();
            }
            Action::CommandConfirm => {
                self.input_mode = InputMode::Normal;
                let route = Route::parse(&self.command_input);
                self.command_input.clear();
                self.navigate(route);
            }

            // Detail
            Action::DetailLoaded {
                generation,
                outcome,
            } => {
                if let Some(view) = &mut self.detail {
                    view.apply(generation, outcome);
                }
            }
            Action::OpenInBrowser => {
                if let Some(url) = self.detail_url() {
                    if let Err(e) = open::that(&url) {
                        self.update(FolioError::Io(e).into());
                    }
                }
            }
            Action::YankUrl => {
                if let Some(url) = self.detail_url() {
                    match arboard::Clipboard::new().and_then(|mut c| c.set_text(url)) {
                        Ok(()) => self.notify("Copied URL to clipboard.", false),
                        Err(e) => self.notify(format!("Clipboard error: {}", e), true),
                    }
                }
            }

            // Popups
            Action::ShowCreate => {
                if self.screen == Screen::List {
                    self.modal = Some(Modal::Create(CreateForm::default()));
                }
            }
            Action::ShowUpdate => {
                if let Some(view) = self.mutable_detail() {
                    let form = UpdateForm::new(
                        &view.name,
                        view.detail.as_ref().and_then(|d| d.description.as_deref()),
                    );
                    self.modal = Some(Modal::Update(form));
                }
            }
            Action::ShowDelete => {
                if let Some(view) = self.mutable_detail() {
                    self.modal = Some(Modal::Delete(DeleteConfirm::new(&view.name)));
                }
            }
            Action::ModalInput(c) => match &mut self.modal {
                Some(Modal::Create(form)) => form.input(c),
                Some(Modal::Update(form)) => form.input(c),
                _ => {}
            },
            Action::ModalBackspace => match &mut self.modal {
                Some(Modal::Create(form)) => form.backspace(),
                Some(Modal::Update(form)) => form.backspace(),
                _ => {}
            },
            Action::ModalNextField => {
                if let Some(Modal::Create(form)) = &mut self.modal {
                    form.next_field();
                }
            }
            Action::ModalSubmit => self.submit_modal(),
            Action::ModalCancel => {
                if !self.modal.as_ref().is_some_and(Modal::is_submitting) {
                    self.modal = None;
                }
            }

            // Mutation results
            Action::RepoCreated(repo) => {
                self.listing.add_local_item(RepositoryRef::from(*repo));
                self.selected = 0;
                if matches!(self.modal, Some(Modal::Create(_))) {
                    self.modal = None;
                }
                self.notify("Repository created.", false);
            }
            Action::CreateFailed(msg) => {
                if let Some(Modal::Create(form)) = &mut self.modal {
                    form.fail(&msg);
                }
            }
            Action::DescriptionUpdated => {
                self.modal = None;
                self.notify("Repository updated.", false);
                self.mark_mutated_and_refresh();
            }
            Action::UpdateFailed(msg) => {
                if let Some(Modal::Update(form)) = &mut self.modal {
                    form.fail(&msg);
                }
            }
            Action::RepoDeleted => {
                self.modal = None;
                self.notify("Repository deleted successfully.", false);
                self.mark_mutated_and_refresh();
            }
            Action::DeleteFailed { denied, message } => {
                self.modal = None;
                if denied {
                    self.notify(
                        "Permission denied. You do not have the necessary permissions to delete this repository.",
                        true,
                    );
                } else {
                    self.notify(format!("Error deleting repository: {}", message), true);
                }
            }

            Action::Error(msg) => {
                self.notify(msg, true);
            }
            Action::None => {}
        }
    }

    /// Switch to the fallback screen after a caught panic.
    pub fn enter_fault(&mut self, message: String) {
        tracing::error!(%message, "recovered from fault");
        self.screen = Screen::Fault;
        self.fault = Some(message);
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }

    /// Start over with fresh state, as if the program had just launched.
    fn reload(&mut self) {
        *self = App::new(Arc::clone(&self.forge), self.action_tx.clone());
        self.navigate(Route::List);
    }

    fn navigate(&mut self, route: Route) {
        self.modal = None;
        match route {
            Route::List => {
                self.screen = Screen::List;
                self.detail = None;
                if !self.listing_started {
                    self.listing_started = true;
                    let ticket = self.listing.begin_fetch();
                    self.spawn_fetch(ticket);
                }
            }
            Route::Detail(name) => {
                self.detail = Some(DetailView::by_name(name));
                self.screen = Screen::Detail;
                self.refresh_detail();
            }
            Route::NotFound(path) => {
                self.not_found_path = path;
                self.screen = Screen::NotFound;
            }
        }
    }

    fn back_to_list(&mut self) {
        let mutated = self.detail.as_ref().is_some_and(|view| view.mutated);
        self.navigate(Route::List);
        if mutated {
            let ticket = self.listing.begin_fetch();
            self.spawn_fetch(ticket);
        }
    }

    fn search(&mut self, term: String) {
        let ticket = self.listing.set_search_term(term);
        self.selected = 0;
        self.spawn_fetch(ticket);
    }

    fn detail_url(&self) -> Option<String> {
        if self.screen != Screen::Detail {
            return None;
        }
        let view = self.detail.as_ref()?;
        Some(
            view.web_url()
                .map(str::to_string)
                .unwrap_or_else(|| self.forge.web_url(&view.name)),
        )
    }

    fn mutable_detail(&self) -> Option<&DetailView> {
        if self.screen != Screen::Detail {
            return None;
        }
        self.detail.as_ref().filter(|view| view.can_mutate())
    }

    fn refresh_detail(&mut self) {
        if let Some(view) = &mut self.detail {
            let generation = view.begin_refresh();
            let name = view.name.clone();
            self.spawn_load_detail(generation, name);
        }
    }

    fn mark_mutated_and_refresh(&mut self) {
        if let Some(view) = &mut self.detail {
            view.mutated = true;
        }
        self.refresh_detail();
    }

    fn notify(&mut self, message: impl Into<String>, is_error: bool) {
        self.notice = Some(Notice {
            message: message.into(),
            is_error,
            expires_at: Instant::now() + NOTICE_TTL,
        });
    }

    fn submit_modal(&mut self) {
        match &mut self.modal {
            Some(Modal::Create(form)) => {
                if let Some(new_repo) = form.submit(self.listing.items()) {
                    self.spawn_create(new_repo);
                }
            }
            Some(Modal::Update(form)) => {
                if let Some(description) = form.submit() {
                    let name = form.name.clone();
                    self.spawn_update(name, description);
                }
            }
            Some(Modal::Delete(confirm)) => {
                if confirm.confirm() {
                    let name = confirm.name.clone();
                    self.spawn_delete(name);
                }
            }
            None => {}
        }
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let tx = self.action_tx.clone();
        let forge = Arc::clone(&self.forge);
        tokio::spawn(async move {
            let outcome = listing::load(forge.as_ref(), &ticket.query).await;
            tx.send(Action::ListingLoaded {
                generation: ticket.generation,
                outcome,
            })
            .ok();
        });
    }

    fn spawn_load_detail(&self, generation: u64, name: String) {
        let tx = self.action_tx.clone();
        let forge = Arc::clone(&self.forge);
        tokio::spawn(async move {
            let outcome = detail::load(forge.as_ref(), &name).await;
            tx.send(Action::DetailLoaded {
                generation,
                outcome,
            })
            .ok();
        });
    }

    fn spawn_create(&self, new_repo: NewRepo) {
        let tx = self.action_tx.clone();
        let forge = Arc::clone(&self.forge);
        tokio::spawn(async move {
            match forge.create_repo(&new_repo).await {
                Ok(repo) => {
                    tx.send(Action::RepoCreated(Box::new(repo))).ok();
                }
                Err(e) => {
                    tracing::error!(error = %e, name = %new_repo.name, "error creating repository");
                    tx.send(Action::CreateFailed(e.user_message())).ok();
                }
            }
        });
    }

    fn spawn_update(&self, name: String, description: String) {
        let tx = self.action_tx.clone();
        let forge = Arc::clone(&self.forge);
        tokio::spawn(async move {
            match forge.update_description(&name, &description).await {
                Ok(()) => {
                    tx.send(Action::DescriptionUpdated).ok();
                }
                Err(e) => {
                    tracing::error!(error = %e, %name, "error updating repository");
                    tx.send(Action::UpdateFailed(e.user_message())).ok();
                }
            }
        });
    }

    fn spawn_delete(&self, name: String) {
        let tx = self.action_tx.clone();
        let forge = Arc::clone(&self.forge);
        tokio::spawn(async move {
            match forge.delete_repo(&name).await {
                Ok(()) => {
                    tx.send(Action::RepoDeleted).ok();
                }
                Err(e) => {
                    tracing::error!(error = %e, %name, "error deleting repository");
                    tx.send(Action::DeleteFailed {
                        denied: e.is_permission_denied(),
                        message: e.user_message(),
                    })
                    .ok();
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary;
    use crate::forge::fake::FakeForge;
    use crate::modal::DUPLICATE_NAME;
    use crossterm::event::KeyModifiers;

    type Rx = mpsc::UnboundedReceiver<Action>;

    fn app_with(forge: FakeForge) -> (App, Arc<FakeForge>, Rx) {
        let forge = Arc::new(forge);
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(forge.clone(), tx);
        (app, forge, rx)
    }

    /// Feed every action produced by spawned tasks back into the app.
    async fn settle(app: &mut App, rx: &mut Rx) {
        while let Ok(Some(action)) = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await
        {
            app.update(action);
        }
    }

    async fn started(forge: FakeForge) -> (App, Arc<FakeForge>, Rx) {
        let (mut app, forge, mut rx) = app_with(forge);
        app.update(Action::Navigate(Route::List));
        settle(&mut app, &mut rx).await;
        (app, forge, rx)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.update(Action::ModalInput(c));
        }
    }

    async fn create(app: &mut App, rx: &mut Rx, name: &str) {
        app.update(Action::ShowCreate);
        type_text(app, name);
        app.update(Action::ModalNextField);
        type_text(app, "made here");
        app.update(Action::ModalSubmit);
        settle(app, rx).await;
    }

    fn names(app: &App) -> Vec<String> {
        app.listing
            .items()
            .iter()
            .map(|i| i.name().to_string())
            .collect()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn startup_loads_first_page() {
        let (app, forge, _rx) = started(FakeForge::with_names(&["a", "b", "c", "d"])).await;
        assert_eq!(names(&app), vec!["a", "b", "c"]);
        assert!(app.listing.has_more());
        assert!(!app.listing.loading());
        assert_eq!(FakeForge::calls(&forge.list_calls), 1);
    }

    #[tokio::test]
    async fn paging_forward_and_back() {
        let (mut app, _forge, mut rx) =
            started(FakeForge::with_names(&["a", "b", "c", "d"])).await;

        app.update(Action::NextPage);
        assert!(app.listing.loading());
        settle(&mut app, &mut rx).await;
        assert_eq!(app.listing.page(), 2);
        assert_eq!(names(&app), vec!["d"]);
        assert!(!app.listing.has_more());

        app.update(Action::NextPage);
        settle(&mut app, &mut rx).await;
        assert_eq!(app.listing.page(), 1);
        assert_eq!(names(&app), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn live_search_applies_latest_term() {
        let (mut app, forge, mut rx) =
            started(FakeForge::with_names(&["foo", "food", "bar"])).await;

        app.update(Action::EnterSearchMode);
        for c in "foo".chars() {
            app.update(Action::SearchInput(c));
        }
        settle(&mut app, &mut rx).await;

        assert_eq!(app.listing.search_term(), "foo");
        assert_eq!(names(&app), vec!["foo", "food"]);
        assert_eq!(FakeForge::calls(&forge.search_calls), 3);

        app.update(Action::ClearSearch);
        settle(&mut app, &mut rx).await;
        assert_eq!(names(&app), vec!["foo", "food", "bar"]);
    }

    #[tokio::test]
    async fn duplicate_create_never_reaches_api() {
        let (mut app, forge, mut rx) = started(FakeForge::with_names(&["x"])).await;

        create(&mut app, &mut rx, "x").await;

        match &app.modal {
            Some(Modal::Create(form)) => {
                assert_eq!(form.error.as_deref(), Some(DUPLICATE_NAME));
                assert!(!form.submitting);
            }
            other => panic!("expected create form, got {:?}", other),
        }
        assert_eq!(FakeForge::calls(&forge.create_calls), 0);
    }

    #[tokio::test]
    async fn created_repo_is_mutable_listed_repo_is_not() {
        let (mut app, forge, mut rx) = started(FakeForge::with_names(&["old"])).await;

        create(&mut app, &mut rx, "y").await;
        assert!(app.modal.is_none());
        assert_eq!(names(&app), vec!["y", "old"]);
        assert_eq!(FakeForge::calls(&forge.create_calls), 1);

        app.update(Action::Select);
        assert_eq!(app.screen, Screen::Detail);
        assert!(app.detail.as_ref().unwrap().can_mutate());
        assert_eq!(FakeForge::calls(&forge.get_calls), 0);

        app.update(Action::Back);
        app.update(Action::ScrollDown);
        app.update(Action::Select);
        assert!(!app.detail.as_ref().unwrap().can_mutate());
        app.update(Action::ShowUpdate);
        app.update(Action::ShowDelete);
        assert!(app.modal.is_none());
    }

    #[tokio::test]
    async fn permission_denied_delete_is_reported_distinctly() {
        let forge = FakeForge {
            deny_delete: true,
            ..FakeForge::with_names(&["old"])
        };
        let (mut app, forge, mut rx) = started(forge).await;
        create(&mut app, &mut rx, "z").await;

        app.update(Action::Select);
        app.update(Action::ShowDelete);
        app.update(Action::ModalSubmit);
        settle(&mut app, &mut rx).await;

        let notice = app.notice.as_ref().unwrap();
        assert!(notice.is_error);
        assert!(notice.message.starts_with("Permission denied."));
        assert!(app.modal.is_none());

        app.update(Action::Back);
        assert!(app.listing.contains_name("z"));
        assert_eq!(FakeForge::calls(&forge.delete_calls), 1);
    }

    #[tokio::test]
    async fn delete_then_back_refetches_listing() {
        let (mut app, forge, mut rx) = started(FakeForge::with_names(&["old"])).await;
        create(&mut app, &mut rx, "gone").await;

        app.update(Action::Select);
        app.update(Action::ShowDelete);
        app.update(Action::ModalSubmit);
        settle(&mut app, &mut rx).await;
        assert_eq!(
            app.notice.as_ref().unwrap().message,
            "Repository deleted successfully."
        );

        app.update(Action::Back);
        settle(&mut app, &mut rx).await;
        assert_eq!(names(&app), vec!["old"]);
        assert_eq!(FakeForge::calls(&forge.list_calls), 2);
    }

    #[tokio::test]
    async fn update_refreshes_detail() {
        let (mut app, forge, mut rx) = started(FakeForge::with_names(&[])).await;
        create(&mut app, &mut rx, "y").await;

        app.update(Action::Select);
        app.update(Action::ShowUpdate);
        match &app.modal {
            Some(Modal::Update(form)) => assert_eq!(form.description, "made here"),
            other => panic!("expected update form, got {:?}", other),
        }
        type_text(&mut app, "!");
        app.update(Action::ModalSubmit);
        settle(&mut app, &mut rx).await;

        assert!(app.modal.is_none());
        let detail = app.detail.as_ref().unwrap().detail.as_ref().unwrap();
        assert_eq!(detail.description.as_deref(), Some("made here!"));
        assert_eq!(FakeForge::calls(&forge.get_calls), 1);
    }

    #[tokio::test]
    async fn routes_open_detail_and_not_found() {
        let (mut app, forge, mut rx) = app_with(FakeForge::with_names(&["alpha"]));

        app.update(Action::Navigate(Route::parse("/repos/alpha")));
        assert_eq!(app.screen, Screen::Detail);
        settle(&mut app, &mut rx).await;
        let view = app.detail.as_ref().unwrap();
        assert_eq!(view.detail.as_ref().unwrap().name, "alpha");
        assert!(!view.can_mutate());
        assert_eq!(FakeForge::calls(&forge.get_calls), 1);

        app.update(Action::EnterCommandMode);
        for c in "/nope".chars() {
            app.update(Action::CommandInput(c));
        }
        app.update(Action::CommandConfirm);
        assert_eq!(app.screen, Screen::NotFound);
        assert_eq!(app.not_found_path, "/nope");

        let action = app.handle_event(key(KeyCode::Enter));
        app.update(action);
        assert_eq!(app.screen, Screen::List);
        settle(&mut app, &mut rx).await;
        assert_eq!(names(&app), vec!["alpha"]);
    }

    #[tokio::test]
    async fn fault_screen_reloads_from_scratch() {
        let (mut app, forge, mut rx) = started(FakeForge::with_names(&["a"])).await;
        app.update(Action::EnterSearchMode);
        app.update(Action::SearchInput('a'));
        settle(&mut app, &mut rx).await;

        app.enter_fault("boom".into());
        assert_eq!(app.screen, Screen::Fault);
        assert!(matches!(app.handle_event(key(KeyCode::Char('j'))), Action::None));

        let action = app.handle_event(key(KeyCode::Char('r')));
        app.update(action);
        settle(&mut app, &mut rx).await;
        assert_eq!(app.screen, Screen::List);
        assert_eq!(app.listing.search_term(), "");
        assert!(app.fault.is_none());
        assert_eq!(FakeForge::calls(&forge.list_calls), 2);
    }

    #[tokio::test]
    async fn fault_key_lands_on_fault_screen() {
        let (mut app, _forge, _rx) = app_with(FakeForge::with_names(&[]));
        let action = app.handle_event(key(KeyCode::Char('!')));
        assert!(matches!(action, Action::TriggerFault));

        let msg = boundary::guard(|| app.update(action)).unwrap_err();
        app.enter_fault(msg);
        assert_eq!(app.screen, Screen::Fault);
        assert_eq!(
            app.fault.as_deref(),
            Some("test fault raised from the repository list")
        );
    }

    #[tokio::test]
    async fn profile_key_on_list_only() {
        let (mut app, forge, _rx) = app_with(FakeForge::with_names(&[]));
        assert!(matches!(
            app.handle_event(key(KeyCode::Char('o'))),
            Action::OpenProfile
        ));
        assert_eq!(forge.profile_url(), "https://github.com/7-lynxx");

        app.update(Action::Navigate(Route::parse("/nowhere")));
        assert!(matches!(app.handle_event(key(KeyCode::Char('o'))), Action::None));
        assert!(matches!(app.handle_event(key(KeyCode::Char('!'))), Action::None));
    }

    #[tokio::test]
    async fn keys_route_to_open_popup() {
        let (mut app, _forge, _rx) = app_with(FakeForge::with_names(&[]));
        app.update(Action::ShowCreate);
        assert!(matches!(
            app.handle_event(key(KeyCode::Char('q'))),
            Action::ModalInput('q')
        ));
        assert!(matches!(app.handle_event(key(KeyCode::Esc)), Action::ModalCancel));

        app.update(Action::ModalCancel);
        assert!(matches!(app.handle_event(key(KeyCode::Char('q'))), Action::Quit));
        assert!(matches!(
            app.handle_event(key(KeyCode::Char('/'))),
            Action::EnterSearchMode
        ));
    }

    #[tokio::test]
    async fn missing_repo_still_has_web_url() {
        let (mut app, forge, mut rx) = app_with(FakeForge::with_names(&[]));
        app.update(Action::Navigate(Route::parse("/repos/ghost")));
        settle(&mut app, &mut rx).await;

        let view = app.detail.as_ref().unwrap();
        assert!(view.detail.is_none());
        assert!(!view.loading);
        assert_eq!(
            app.detail_url().as_deref(),
            Some("https://github.com/7-lynxx/ghost")
        );
        assert_eq!(FakeForge::calls(&forge.update_calls), 0);
    }

    #[tokio::test]
    async fn notice_expires_on_tick() {
        let (mut app, _forge, _rx) = app_with(FakeForge::with_names(&[]));
        app.update(Action::Error("oops".into()));
        app.update(Action::Tick);
        assert!(app.notice.is_some());

        if let Some(notice) = &mut app.notice {
            notice.expires_at = Instant::now() - Duration::from_millis(1);
        }
        app.update(Action::Tick);
        assert!(app.notice.is_none());
    }
}
