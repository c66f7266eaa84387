//! Gift Wizard Common Library
//!
//! CLIと他のフロントエンドで共有される状態遷移と型

pub mod error;
pub mod form;
pub mod wizard;
pub mod request;
pub mod response;
pub mod carousel;
pub mod reveal;
pub mod feedback;
pub mod modal;
pub mod image_bounds;

pub use error::{Error, Result};
pub use form::{FormData, Gender, Month, OutfitImage, RawFile};
pub use wizard::{can_leave, next_enabled, reduce, submit_enabled, Step, WizardEvent, WizardState};
pub use request::{parse_budget, GiftRequest};
pub use response::{ApiResponse, Bundle, Item, ItemCategory, Recommendations, RequestContext};
pub use carousel::Carousel;
pub use reveal::RevealFrame;
pub use feedback::{FeedbackForm, FeedbackQuestion, FeedbackReceipt};
pub use modal::ActiveModal;
