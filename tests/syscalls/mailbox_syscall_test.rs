/*!
 * Mailbox Syscall Tests
 * ABI return codes for every mailbox syscall
 */

use mailbox_kernel::ipc::mailbox::{MailboxManager, MAILBOX_RECORD_SIZE};
use mailbox_kernel::memory::{MemoryManager, UserAddressSpace, UserPtr};
use mailbox_kernel::syscalls::{Syscall, SyscallExecutor, SyscallResult};
use nix::errno::Errno;
use pretty_assertions::assert_eq;
use std::collections::HashSet;

const PID: u32 = 500;

fn setup(pool: usize) -> (SyscallExecutor, UserAddressSpace) {
    let executor = SyscallExecutor::new(MailboxManager::new(MemoryManager::with_capacity(pool)));
    (executor, UserAddressSpace::new(PID))
}

fn errno(code: Errno) -> i64 {
    -(code as i64)
}

#[test]
fn test_full_exchange_through_syscalls() {
    let (executor, space) = setup(1 << 16);
    let run = |syscall: Syscall| executor.execute(PID, &space, &syscall).return_code();

    assert_eq!(run(Syscall::CreateMailbox { id: 1 }), 0);
    assert_eq!(run(Syscall::CountMailboxes), 1);

    let payload = space.map_bytes(b"HELLO");
    assert_eq!(
        run(Syscall::SendMessage {
            id: 1,
            payload,
            len: 5,
            key: 0xCAFE_BABE
        }),
        5
    );
    assert_eq!(run(Syscall::CountMessages { id: 1 }), 1);

    let buffer = space.map(16);
    assert_eq!(
        run(Syscall::ReceiveMessage {
            id: 1,
            buffer,
            max_len: 16,
            key: 0xCAFE_BABE
        }),
        5
    );
    assert_eq!(space.read(buffer, 5).unwrap(), b"HELLO".to_vec());
    assert_eq!(run(Syscall::RemoveMailbox { id: 1 }), 0);
    assert_eq!(run(Syscall::CountMailboxes), 0);
}

#[test]
fn test_every_error_kind_has_distinct_code() {
    let (executor, space) = setup(MAILBOX_RECORD_SIZE * 2 + 16);
    let run = |syscall: Syscall| executor.execute(PID, &space, &syscall).return_code();

    assert_eq!(run(Syscall::CreateMailbox { id: 1 }), 0);
    assert_eq!(run(Syscall::CreateMailbox { id: 2 }), 0);
    let payload = space.map_bytes(&[1u8; 64]);
    let out = space.map(8);

    let codes = vec![
        run(Syscall::CreateMailbox { id: 1 }),
        run(Syscall::RemoveMailbox { id: 99 }),
        {
            run(Syscall::SendMessage { id: 2, payload, len: 4, key: 0 });
            run(Syscall::RemoveMailbox { id: 2 })
        },
        run(Syscall::ReceiveMessage { id: 1, buffer: out, max_len: 8, key: 0 }),
        run(Syscall::SendMessage { id: 1, payload, len: 64, key: 0 }),
        run(Syscall::SendMessage { id: 1, payload: UserPtr::NULL, len: 4, key: 0 }),
        run(Syscall::ListMailboxes { buffer: space.map(4), capacity: 2 }),
    ];

    assert_eq!(
        codes,
        vec![
            errno(Errno::EEXIST),
            errno(Errno::ENOENT),
            errno(Errno::ENOTEMPTY),
            errno(Errno::ENOMSG),
            errno(Errno::ENOMEM),
            errno(Errno::EFAULT),
            errno(Errno::EIO),
        ]
    );
    assert_eq!(codes.iter().collect::<HashSet<_>>().len(), codes.len());
}

#[test]
fn test_list_mailboxes_syscall() {
    let (executor, space) = setup(1 << 16);
    for id in 1..=5 {
        executor.execute(PID, &space, &Syscall::CreateMailbox { id });
    }

    let buffer = space.map(2 * 8);
    let result = executor.execute(PID, &space, &Syscall::ListMailboxes { buffer, capacity: 2 });
    assert_eq!(result, SyscallResult::Success { value: 2 });
}

#[test]
fn test_error_result_carries_message() {
    let (executor, space) = setup(1 << 16);
    match executor.execute(PID, &space, &Syscall::CountMessages { id: 4 }) {
        SyscallResult::Error { code, message } => {
            assert_eq!(code, errno(Errno::ENOENT));
            assert_eq!(message, "Mailbox 4 not found");
        }
        other => panic!("expected error, got {other:?}"),
    }
}

#[test]
fn test_json_requests() {
    let (executor, space) = setup(1 << 16);

    let created = executor.execute_json(PID, &space, br#"{"syscall":"create_mailbox","id":12}"#);
    assert_eq!(created, SyscallResult::Success { value: 0 });

    let json = serde_json::to_string(&executor.execute_json(
        PID,
        &space,
        br#"{"syscall":"remove_mailbox","id":13}"#,
    ))
    .unwrap();
    assert_eq!(
        json,
        r#"{"status":"error","code":-2,"message":"Mailbox 13 not found"}"#
    );
}
