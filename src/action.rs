use crate::detail::DetailOutcome;
use crate::error::FolioError;
use crate::listing::FetchOutcome;
use crate::route::Route;
use crate::types::RepositoryDetail;

/// Which single-line prompt is capturing keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Command,
}

#[derive(Debug, Clone)]
#[allow(clippy::enum_variant_names)]
pub enum Action {
    Quit,
    Back,
    ScrollUp,
    ScrollDown,
    Select,
    Tick,

    // Navigation
    Navigate(Route),
    Reload,
    OpenProfile,
    TriggerFault,

    // Listing
    NextPage,
    PrevPage,
    Refresh,
    ListingLoaded { generation: u64, outcome: FetchOutcome },

    // Search
    EnterSearchMode,
    ExitSearchMode,
    SearchInput(char),
    SearchBackspace,
    ClearSearch,

    // Path prompt
    EnterCommandMode,
    ExitCommandMode,
    CommandInput(char),
    CommandBackspace,
    CommandConfirm,

    // Detail
    DetailLoaded { generation: u64, outcome: DetailOutcome },
    OpenInBrowser,
    YankUrl,

    // Popups
    ShowCreate,
    ShowUpdate,
    ShowDelete,
    ModalInput(char),
    ModalBackspace,
    ModalNextField,
    ModalSubmit,
    ModalCancel,

    // Mutation results
    RepoCreated(Box<RepositoryDetail>),
    CreateFailed(String),
    DescriptionUpdated,
    UpdateFailed(String),
    RepoDeleted,
    DeleteFailed { denied: bool, message: String },

    Error(String),
    None,
}

impl From<FolioError> for Action {
    fn from(err: FolioError) -> Self {
        Action::Error(err.to_string())
    }
}
