//! UI Components
//!
//! Leptos components for the template item list.

mod delete_confirm_popup;
mod group_items_modal;
mod item_list;
mod item_row;
mod item_text;
mod notice_bar;
mod order_controls;
mod take_eval_link;

pub use delete_confirm_popup::DeleteConfirmPopup;
pub use group_items_modal::GroupItemsModal;
pub use item_list::{DropSlotLine, ItemList};
pub use item_row::{BlockChildRow, ItemRow};
pub use item_text::ItemText;
pub use notice_bar::NoticeBar;
pub use order_controls::OrderControls;
pub use take_eval_link::TakeEvalLink;
