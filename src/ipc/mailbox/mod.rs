/*!
 * Mailbox IPC
 * Registry of ciphered FIFO mailboxes behind a single exclusion gate
 */

pub mod cipher;
mod lifecycle;
mod manager;
mod operations;
pub mod queue;
pub mod registry;
pub mod types;

pub use cipher::{xor_blocks, BlockCipher};
pub use lifecycle::MAILBOX_RECORD_SIZE;
pub use manager::MailboxManager;
pub use queue::{Message, MessageQueue};
pub use registry::{Mailbox, Registry};
pub use types::{MailboxError, MailboxResult, MailboxStats};
