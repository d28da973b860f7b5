//! Small sequential thread ids for the `{thread}` placeholder

use parking_lot::Mutex;
use std::cell::Cell;
use std::collections::HashMap;
use std::sync::LazyLock;
use std::thread::{self, ThreadId};

/// Append-only table assigning ids in first-lookup order, starting at 0.
#[derive(Debug, Default)]
pub struct ThreadIdTable {
    inner: Mutex<TableInner>,
}

#[derive(Debug, Default)]
struct TableInner {
    next_id: u32,
    ids: HashMap<ThreadId, u32>,
}

impl ThreadIdTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id bound to `thread`, allocating the next one if it has none yet.
    pub fn id_for(&self, thread: ThreadId) -> u32 {
        let mut inner = self.inner.lock();
        if let Some(&id) = inner.ids.get(&thread) {
            return id;
        }
        let id = inner.next_id;
        inner.next_id += 1;
        inner.ids.insert(thread, id);
        id
    }

    /// Number of distinct threads seen so far
    pub fn len(&self) -> usize {
        self.inner.lock().ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

static THREAD_IDS: LazyLock<ThreadIdTable> = LazyLock::new(ThreadIdTable::new);

thread_local! {
    static THREAD_ID_CACHE: Cell<Option<u32>> = const { Cell::new(None) };
}

/// Id used for the calling thread in log output.
///
/// The first call on a thread takes the process-wide table lock; later calls
/// are served from a thread-local cache.
pub fn this_thread_id() -> u32 {
    THREAD_ID_CACHE.with(|cache| match cache.get() {
        Some(id) => id,
        None => {
            let id = THREAD_IDS.id_for(thread::current().id());
            cache.set(Some(id));
            id
        }
    })
}
