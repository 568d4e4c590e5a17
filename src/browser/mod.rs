// Page navigation and DOM reads behind a narrow interface.

pub mod page;
pub mod session;

pub use page::{scroll_to_bottom, Element, HtmlPage, Page, WaitPolicy};
pub use session::{Browser, Session};
