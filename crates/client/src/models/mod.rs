//! Wire and view models
//!
//! Shapes of the `/api/v1` contract plus the conversation log entry.

mod chat;
mod paper;
mod status;
mod submission;
mod task;

pub use chat::{ChatRequest, ChatResponse, ConversationMessage, Role};
pub use paper::{Author, PaperDetail, PaperListItem};
pub use status::{BadgeTone, PaperStatus, StatusBadge};
pub use submission::{
    PaperSource, Severity, SubmitOutcome, SubmitPaperRequest, SubmitPaperResponse,
    SubmitPaperResult,
};
pub use task::{CrawlAccepted, TaskState, TaskStatus};
