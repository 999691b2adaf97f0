/*!
 * Mailbox Concurrency Tests
 * Senders and receivers racing on shared mailboxes through the global gate
 */

use mailbox_kernel::ipc::mailbox::{MailboxError, MailboxManager};
use mailbox_kernel::memory::{MemoryManager, UserAddressSpace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

const KEY: u32 = 0xDEAD_BEEF;
const RECORD_LEN: usize = 8;

/// Message body: sender id and sequence number, padded with filler bytes
fn encode(sender: u32, seq: u32, filler: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(RECORD_LEN + filler);
    bytes.extend_from_slice(&sender.to_be_bytes());
    bytes.extend_from_slice(&seq.to_be_bytes());
    bytes.resize(RECORD_LEN + filler, sender as u8);
    bytes
}

fn decode(bytes: &[u8]) -> (u32, u32) {
    let sender = u32::from_be_bytes(bytes[0..4].try_into().unwrap());
    let seq = u32::from_be_bytes(bytes[4..8].try_into().unwrap());
    (sender, seq)
}

fn spawn_senders(
    manager: &MailboxManager,
    space: &Arc<UserAddressSpace>,
    id: u64,
    senders: u32,
    per_sender: u32,
) -> Vec<thread::JoinHandle<()>> {
    (0..senders)
        .map(|sender| {
            let manager = manager.clone();
            let space = Arc::clone(space);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(u64::from(sender) + 1);
                for seq in 0..per_sender {
                    let body = encode(sender, seq, rng.gen_range(0..24));
                    let ptr = space.map_bytes(&body);
                    let sent = manager.send(&*space, id, ptr, body.len(), KEY).unwrap();
                    assert_eq!(sent, body.len());
                    if rng.gen_bool(0.1) {
                        thread::yield_now();
                    }
                }
            })
        })
        .collect()
}

#[test]
fn test_no_loss_or_duplication_with_many_receivers() {
    const SENDERS: u32 = 4;
    const PER_SENDER: u32 = 250;
    const RECEIVERS: usize = 4;
    let total = (SENDERS * PER_SENDER) as usize;

    let memory = MemoryManager::with_capacity(1 << 22);
    let manager = MailboxManager::new(memory.clone());
    let space = Arc::new(UserAddressSpace::new(1));
    manager.create(1).unwrap();
    let baseline = memory.used();

    let received = Arc::new(AtomicUsize::new(0));
    let receivers: Vec<_> = (0..RECEIVERS)
        .map(|_| {
            let manager = manager.clone();
            let space = Arc::clone(&space);
            let received = Arc::clone(&received);
            thread::spawn(move || {
                let out = space.map(64);
                let mut seen = Vec::new();
                while received.load(Ordering::SeqCst) < total {
                    match manager.receive(&*space, 1, out, 64, KEY) {
                        Ok(len) => {
                            received.fetch_add(1, Ordering::SeqCst);
                            seen.push(decode(&space.read(out, len).unwrap()));
                        }
                        Err(MailboxError::Empty(_)) => thread::yield_now(),
                        Err(e) => panic!("unexpected receive error: {e}"),
                    }
                }
                seen
            })
        })
        .collect();

    for handle in spawn_senders(&manager, &space, 1, SENDERS, PER_SENDER) {
        handle.join().unwrap();
    }

    let mut all = HashSet::new();
    for handle in receivers {
        for message in handle.join().unwrap() {
            assert!(all.insert(message), "duplicate delivery of {message:?}");
        }
    }

    assert_eq!(all.len(), total);
    for sender in 0..SENDERS {
        for seq in 0..PER_SENDER {
            assert!(all.contains(&(sender, seq)));
        }
    }
    assert_eq!(manager.count_messages(1).unwrap(), 0);
    assert_eq!(memory.used(), baseline);
}

#[test]
fn test_per_sender_order_preserved() {
    const SENDERS: u32 = 6;
    const PER_SENDER: u32 = 200;
    let total = (SENDERS * PER_SENDER) as usize;

    let manager = MailboxManager::new(MemoryManager::with_capacity(1 << 22));
    let space = Arc::new(UserAddressSpace::new(2));
    manager.create(9).unwrap();

    let senders = spawn_senders(&manager, &space, 9, SENDERS, PER_SENDER);

    let out = space.map(64);
    let mut next_seq: HashMap<u32, u32> = HashMap::new();
    let mut received = 0;
    while received < total {
        match manager.receive(&*space, 9, out, 64, KEY) {
            Ok(len) => {
                let (sender, seq) = decode(&space.read(out, len).unwrap());
                let expected = next_seq.entry(sender).or_insert(0);
                assert_eq!(seq, *expected, "sender {sender} delivered out of order");
                *expected += 1;
                received += 1;
            }
            Err(MailboxError::Empty(_)) => thread::yield_now(),
            Err(e) => panic!("unexpected receive error: {e}"),
        }
    }

    for handle in senders {
        handle.join().unwrap();
    }
    assert!(next_seq.values().all(|count| *count == PER_SENDER));
}

#[test]
fn test_concurrent_create_remove_keeps_count_exact() {
    let manager = MailboxManager::new(MemoryManager::with_capacity(1 << 20));

    let handles: Vec<_> = (0..8u64)
        .map(|worker| {
            let manager = manager.clone();
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(worker);
                let mut owned = Vec::new();
                for i in 0..200u64 {
                    let id = worker * 1_000 + i;
                    manager.create(id).unwrap();
                    owned.push(id);
                    if rng.gen_bool(0.5) {
                        let victim = owned.swap_remove(rng.gen_range(0..owned.len()));
                        manager.remove(victim).unwrap();
                    }
                }
                owned.len()
            })
        })
        .collect();

    let survivors: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(manager.count(), survivors);
    assert_eq!(manager.ids(usize::MAX).len(), survivors);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_tasks_share_manager() {
    let memory = MemoryManager::with_capacity(1 << 20);
    let manager = MailboxManager::new(memory.clone());
    let space = Arc::new(UserAddressSpace::new(3));

    let tasks: Vec<_> = (0..16u64)
        .map(|id| {
            let manager = manager.clone();
            let space = Arc::clone(&space);
            tokio::spawn(async move {
                manager.create(id)?;
                let payload = space.map_bytes(&id.to_be_bytes());
                manager.send(&*space, id, payload, 8, KEY)?;
                tokio::task::yield_now().await;

                let out = space.map(8);
                let len = manager.receive(&*space, id, out, 8, KEY)?;
                assert_eq!(space.read(out, len).unwrap(), id.to_be_bytes().to_vec());
                manager.remove(id)
            })
        })
        .collect();

    for task in tasks {
        tokio_test::assert_ok!(task.await.unwrap());
    }
    assert_eq!(manager.count(), 0);
    assert_eq!(memory.used(), 0);
    assert!(manager.gate_stats().acquisitions >= 16 * 4);
}
