//! Workbench core: pure session state machine for document form fields.
mod builder;
mod effect;
mod error;
mod field;
mod filter;
mod msg;
mod registry;
mod state;
mod submission;
mod template;
mod update;
mod view_model;

pub use builder::{EntryId, EntryValue, FillEntry, FillFormBuilder, RESERVED_KEY_PREFIX};
pub use effect::{Effect, EXPORT_FILENAME};
pub use error::{ActionError, ErrorClass, ImportError};
pub use field::{FieldDescriptor, FieldType};
pub use filter::{field_stats, filter, FilterQuery};
pub use msg::Msg;
pub use registry::FieldRegistry;
pub use state::{
    DocumentInfo, MutationResult, Phase, SearchPanel, Session, StatusKind, StatusLine,
    TemplatePanel,
};
pub use submission::{
    build_request, snapshot, ClearScope, DownloadHandle, MutationKind, MutationOutcome,
    MutationRequest, CHECKED_VALUE, CLEARED_ALL_MESSAGE, UNCHECKED_VALUE,
};
pub use template::{synthesize, ExportFormat, SynthesizedTemplate, TemplateEntry, TemplatePurpose};
pub use update::update;
pub use view_model::{
    ControlState, EntryRowView, FieldRowView, ResultView, SearchView, SessionView,
};
