//! Registry of callbacks owned through RAII tokens
//!
//! `CallbackList` stores callbacks under fresh, never reused ids. Each `add`
//! returns a [`CallbackToken`]; dropping the token removes exactly that entry.
//! The same registry backs both the logger's sinks and its "on log" hooks.
//!
//! Insert and remove take the write lock; iteration takes a read lock, so
//! concurrent dispatches proceed in parallel. The lock is fair: once a writer
//! is waiting, new outermost readers queue behind it, so a steady stream of
//! dispatches cannot hold off `add` or a token drop. Only a dispatch nested
//! inside another one on the same thread (a callback that logs again) takes a
//! recursive read, which it must, since the thread already holds the lock.
//!
//! From inside a callback, neither `add` nor dropping a token of the same list
//! is allowed: both need the write lock the calling thread is blocking, and
//! deadlock.

use parking_lot::{RwLock, RwLockReadGuard};
use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

struct Entries<T: ?Sized> {
    next_id: u64,
    entries: Vec<(u64, Box<T>)>,
}

impl<T: ?Sized> Entries<T> {
    fn take(&mut self, id: u64) -> Option<Box<T>> {
        let pos = self.entries.iter().position(|(entry_id, _)| *entry_id == id)?;
        Some(self.entries.remove(pos).1)
    }
}

trait Unregister: Send + Sync {
    fn unregister(&self, id: u64);
}

impl<T: ?Sized + Send + Sync> Unregister for RwLock<Entries<T>> {
    fn unregister(&self, id: u64) {
        let removed = self.write().take(id);
        // Release owned resources (e.g. a worker thread join) outside the lock.
        drop(removed);
    }
}

thread_local! {
    static DISPATCH_DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// Marks the calling thread as iterating a callback list until dropped.
struct DispatchScope;

impl DispatchScope {
    fn enter() -> Self {
        DISPATCH_DEPTH.with(|depth| depth.set(depth.get() + 1));
        DispatchScope
    }
}

impl Drop for DispatchScope {
    fn drop(&mut self) {
        DISPATCH_DEPTH.with(|depth| depth.set(depth.get() - 1));
    }
}

fn in_dispatch() -> bool {
    DISPATCH_DEPTH.with(|depth| depth.get() > 0)
}

/// Ordered list of callbacks of one trait-object type.
pub struct CallbackList<T: ?Sized> {
    inner: Arc<RwLock<Entries<T>>>,
}

impl<T: ?Sized + Send + Sync + 'static> CallbackList<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Entries {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register `callback`; it stays registered until the returned token is dropped.
    #[must_use = "dropping the token immediately unregisters the callback"]
    pub fn add(&self, callback: Box<T>) -> CallbackToken {
        let id = {
            let mut entries = self.inner.write();
            entries.next_id += 1;
            let id = entries.next_id;
            entries.entries.push((id, callback));
            id
        };
        let registry: Weak<dyn Unregister> = Arc::downgrade(&self.inner) as Weak<dyn Unregister>;
        CallbackToken { id, registry }
    }

    /// Call `f` on every registered callback, in registration order.
    pub fn for_each(&self, mut f: impl FnMut(&T)) {
        let entries = self.read();
        let _scope = DispatchScope::enter();
        for (_, callback) in entries.entries.iter() {
            f(callback.as_ref());
        }
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, id: u64) -> bool {
        self.read()
            .entries
            .iter()
            .any(|(entry_id, _)| *entry_id == id)
    }
}

impl<T: ?Sized> CallbackList<T> {
    /// Fair read, or a recursive one if this thread is already dispatching
    /// and may hold this lock.
    fn read(&self) -> RwLockReadGuard<'_, Entries<T>> {
        if in_dispatch() {
            self.inner.read_recursive()
        } else {
            self.inner.read()
        }
    }
}

impl<T: ?Sized + Send + Sync + 'static> Default for CallbackList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for CallbackList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackList")
            .field("len", &self.read().entries.len())
            .finish()
    }
}

/// Ownership token for one registry entry.
///
/// Dropping it (or calling [`CallbackToken::release`]) removes the entry. A
/// token whose registry no longer exists is inert.
#[must_use = "dropping the token immediately unregisters the callback"]
pub struct CallbackToken {
    id: u64,
    registry: Weak<dyn Unregister>,
}

impl CallbackToken {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether the token is bound to a registry that still exists.
    pub fn is_live(&self) -> bool {
        self.registry.strong_count() > 0
    }

    /// Whether this token's entry is currently registered in `list`.
    pub fn is_registered_in<T: ?Sized + Send + Sync + 'static>(&self, list: &CallbackList<T>) -> bool {
        self.is_live() && list.contains(self.id)
    }

    /// Unregister now; equivalent to dropping the token.
    pub fn release(self) {}
}

impl fmt::Debug for CallbackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackToken")
            .field("id", &self.id)
            .field("live", &self.is_live())
            .finish()
    }
}

impl Drop for CallbackToken {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unregister(self.id);
        }
    }
}

/// Run one callback, containing any panic so the caller can carry on with
/// the remaining callbacks. Returns `false` if the callback panicked.
pub(crate) fn isolate(label: &str, f: impl FnOnce()) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => true,
        Err(panic_info) => {
            eprintln!(
                "[LOGGER CRITICAL] {} panicked: {}. Other sinks continue to function.",
                label,
                panic_message(&*panic_info)
            );
            false
        }
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Hook = dyn Fn(&str) + Send + Sync;

    fn recorder(log: &Arc<parking_lot::Mutex<Vec<String>>>, tag: &'static str) -> Box<Hook> {
        let log = Arc::clone(log);
        Box::new(move |text: &str| log.lock().push(format!("{tag}:{text}")))
    }

    #[test]
    fn test_add_and_invoke_in_order() {
        let list: CallbackList<Hook> = CallbackList::new();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let _a = list.add(recorder(&seen, "a"));
        let _b = list.add(recorder(&seen, "b"));
        list.for_each(|cb| cb("x"));

        assert_eq!(*seen.lock(), vec!["a:x".to_string(), "b:x".to_string()]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_drop_removes_only_own_entry() {
        let list: CallbackList<Hook> = CallbackList::new();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let a = list.add(recorder(&seen, "a"));
        let b = list.add(recorder(&seen, "b"));
        drop(a);

        assert_eq!(list.len(), 1);
        assert!(b.is_registered_in(&list));
        list.for_each(|cb| cb("y"));
        assert_eq!(*seen.lock(), vec!["b:y".to_string()]);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let list: CallbackList<Hook> = CallbackList::new();
        let first = list.add(Box::new(|_: &str| {}));
        let first_id = first.id();
        drop(first);
        let second = list.add(Box::new(|_: &str| {}));
        assert!(second.id() > first_id);
    }

    #[test]
    fn test_moved_token_unregisters_once() {
        let list: CallbackList<Hook> = CallbackList::new();
        let keep = list.add(Box::new(|_: &str| {}));
        let token = list.add(Box::new(|_: &str| {}));
        let moved = token;
        assert_eq!(list.len(), 2);
        moved.release();
        assert_eq!(list.len(), 1);
        assert!(keep.is_registered_in(&list));
    }

    #[test]
    fn test_token_outliving_registry_is_inert() {
        let list: CallbackList<Hook> = CallbackList::new();
        let token = list.add(Box::new(|_: &str| {}));
        drop(list);
        assert!(!token.is_live());
        drop(token);
    }

    #[test]
    fn test_removed_callback_dropped_after_unregister() {
        struct Tracked(Arc<AtomicUsize>);
        impl Drop for Tracked {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let drops = Arc::new(AtomicUsize::new(0));
        let tracked = Tracked(Arc::clone(&drops));
        let list: CallbackList<Hook> = CallbackList::new();
        let token = list.add(Box::new(move |_: &str| {
            let _keep = &tracked;
        }));

        assert_eq!(drops.load(Ordering::SeqCst), 0);
        drop(token);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_nested_dispatch_with_writer_waiting() {
        use std::sync::mpsc;
        use std::time::Duration;

        let list: Arc<CallbackList<Hook>> = Arc::new(CallbackList::new());
        let nested_calls = Arc::new(AtomicUsize::new(0));
        let (inside_tx, inside_rx) = mpsc::channel();

        let inner_list = Arc::downgrade(&list);
        let calls = Arc::clone(&nested_calls);
        let _outer = list.add(Box::new(move |text: &str| {
            if text != "outer" {
                calls.fetch_add(1, Ordering::SeqCst);
                return;
            }
            inside_tx.send(()).unwrap();
            // Give the writer below time to queue up on the lock.
            std::thread::sleep(Duration::from_millis(50));
            if let Some(list) = inner_list.upgrade() {
                list.for_each(|cb| cb("nested"));
            }
        }));

        let dispatcher = {
            let list = Arc::clone(&list);
            std::thread::spawn(move || list.for_each(|cb| cb("outer")))
        };
        inside_rx.recv().unwrap();
        let late = list.add(Box::new(|_: &str| {}));

        dispatcher.join().unwrap();
        assert_eq!(nested_calls.load(Ordering::SeqCst), 1);
        assert_eq!(list.len(), 2);
        drop(late);
        assert!(!in_dispatch());
    }

    #[test]
    fn test_isolate_contains_panic() {
        assert!(isolate("ok", || {}));
        assert!(!isolate("boom", || panic!("sink failure")));
    }
}
