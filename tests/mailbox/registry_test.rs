/*!
 * Mailbox Registry Tests
 * Create, remove, count, and list through the public manager API
 */

use mailbox_kernel::ipc::mailbox::{MailboxError, MailboxManager, MAILBOX_RECORD_SIZE};
use mailbox_kernel::memory::{MemoryManager, UserAddressSpace};
use pretty_assertions::assert_eq;

const ID_WIDTH: usize = std::mem::size_of::<u64>();

fn setup() -> (MailboxManager, MemoryManager) {
    let memory = MemoryManager::with_capacity(1 << 20);
    (MailboxManager::new(memory.clone()), memory)
}

fn decode_ids(raw: &[u8]) -> Vec<u64> {
    raw.chunks_exact(ID_WIDTH)
        .map(|chunk| u64::from_ne_bytes(chunk.try_into().unwrap()))
        .collect()
}

#[test]
fn test_duplicate_create_rejected() {
    let (manager, _) = setup();

    manager.create(5).unwrap();
    assert_eq!(manager.create(5), Err(MailboxError::DuplicateId(5)));
    assert_eq!(manager.count(), 1);
}

#[test]
fn test_remove_missing_mailbox() {
    let (manager, _) = setup();
    assert_eq!(manager.remove(77), Err(MailboxError::NotFound(77)));
}

#[test]
fn test_remove_non_empty_leaves_mailbox_intact() {
    let (manager, memory) = setup();
    let space = UserAddressSpace::new(1);
    let payload = space.map_bytes(b"pending");

    manager.create(8).unwrap();
    manager.send(&space, 8, payload, 7, 0x0BAD_F00D).unwrap();
    let used = memory.used();

    assert_eq!(
        manager.remove(8),
        Err(MailboxError::NotEmpty { id: 8, msg_count: 1 })
    );
    assert_eq!(manager.count(), 1);
    assert_eq!(manager.count_messages(8).unwrap(), 1);
    assert_eq!(memory.used(), used);

    let out = space.map(7);
    manager.receive(&space, 8, out, 7, 0x0BAD_F00D).unwrap();
    manager.remove(8).unwrap();
    assert_eq!(manager.count(), 0);
    assert_eq!(memory.used(), 0);
}

#[test]
fn test_count_tracks_live_mailboxes() {
    let (manager, memory) = setup();

    for id in 100..110 {
        manager.create(id).unwrap();
    }
    assert_eq!(manager.count(), 10);
    assert_eq!(memory.used(), 10 * MAILBOX_RECORD_SIZE);

    for id in (100..110).step_by(2) {
        manager.remove(id).unwrap();
    }
    assert_eq!(manager.count(), 5);
    assert_eq!(memory.used(), 5 * MAILBOX_RECORD_SIZE);
}

#[test]
fn test_list_capped_at_capacity() {
    let (manager, _) = setup();
    let space = UserAddressSpace::new(1);
    for id in 1..=5 {
        manager.create(id).unwrap();
    }

    let buffer = space.map(2 * ID_WIDTH);
    assert_eq!(manager.list(&space, buffer, 2).unwrap(), 2);

    let ids = decode_ids(&space.read(buffer, 2 * ID_WIDTH).unwrap());
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    assert!(ids.iter().all(|id| (1..=5).contains(id)));
}

#[test]
fn test_list_returns_every_id_when_room() {
    let (manager, _) = setup();
    let space = UserAddressSpace::new(1);
    let mut expected = vec![42, 7, 1_000_000, u64::MAX];
    for id in &expected {
        manager.create(*id).unwrap();
    }

    let buffer = space.map(16 * ID_WIDTH);
    assert_eq!(manager.list(&space, buffer, 16).unwrap(), 4);

    let mut ids = decode_ids(&space.read(buffer, 4 * ID_WIDTH).unwrap());
    ids.sort_unstable();
    expected.sort_unstable();
    assert_eq!(ids, expected);
}

#[test]
fn test_list_short_buffer_is_partial_copy() {
    let (manager, _) = setup();
    let space = UserAddressSpace::new(1);
    for id in 1..=3 {
        manager.create(id).unwrap();
    }

    let buffer = space.map(2 * ID_WIDTH);
    assert_eq!(
        manager.list(&space, buffer, 3),
        Err(MailboxError::PartialCopy {
            written: 2,
            requested: 3
        })
    );
}

#[test]
fn test_create_out_of_memory_leaves_state() {
    let memory = MemoryManager::with_capacity(2 * MAILBOX_RECORD_SIZE);
    let manager = MailboxManager::new(memory.clone());

    manager.create(1).unwrap();
    manager.create(2).unwrap();
    assert!(matches!(
        manager.create(3),
        Err(MailboxError::OutOfMemory { .. })
    ));
    assert_eq!(manager.count(), 2);
    assert_eq!(memory.used(), 2 * MAILBOX_RECORD_SIZE);

    manager.remove(1).unwrap();
    manager.create(3).unwrap();
    assert_eq!(manager.count(), 2);
}
