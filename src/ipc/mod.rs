/*!
 * IPC Module
 * Inter-process communication through kernel mailboxes
 */

pub mod mailbox;

pub use mailbox::{MailboxError, MailboxManager, MailboxResult, MailboxStats};
