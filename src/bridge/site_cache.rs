//! Dispatch-site cache: the memo of negotiated read and write sites.
//!
//! Negotiating a dispatch site is the expensive half of a dynamic attribute
//! access, so each (host type, member name) pair is negotiated at most once
//! per cache and the handle is reused by every later access.
//!
//! ## Caching Strategy
//!
//! - **Read-through**: a miss negotiates, stores, then returns the stored
//!   handle. The handle is never validated at this point; a member the type
//!   does not have is only discovered when the handle is invoked.
//! - **Separate maps for reads and writes**: the two sites take different
//!   arguments and are negotiated independently.
//! - **Insert-if-absent under the write lock**: two threads missing on the
//!   same key serialize on the lock, and the second finds the first one's
//!   handle. Every caller with a key observes the same handle.
//! - **No eviction**: entries live as long as the cache. The process-wide
//!   cache returned by [`global_sites`] therefore grows with the number of
//!   distinct (type, member) pairs ever accessed dynamically.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::dynamic::engine::{DynamicEngine, ReadHandle, WriteHandle};
use crate::dynamic::types::HostType;
use crate::host::error::HostError;

lazy_static! {
    static ref SITES: Arc<DispatchSiteCache> = Arc::new(DispatchSiteCache::new());
}

/// The process-wide cache shared by every bridge built with
/// `shared_cache` enabled. It starts empty and is never torn down.
pub fn global_sites() -> Arc<DispatchSiteCache> {
    Arc::clone(&SITES)
}

/// A (host type, member name) pair identifying one dispatch site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteKey {
    pub host_type: HostType,
    pub member: String,
}

/// Counters observed by [`DispatchSiteCache::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub read_negotiations: usize,
    pub write_negotiations: usize,
    pub read_hits: usize,
    pub write_hits: usize,
}

type SiteMap<H> = RwLock<HashMap<HostType, HashMap<String, H>>>;

#[derive(Default)]
struct Counters {
    negotiations: AtomicUsize,
    hits: AtomicUsize,
}

#[derive(Default)]
pub struct DispatchSiteCache {
    reads: SiteMap<ReadHandle>,
    writes: SiteMap<WriteHandle>,
    read_counters: Counters,
    write_counters: Counters,
}

impl DispatchSiteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the read site for `member` on `host_type`, negotiating it with
    /// `engine` on first use.
    pub fn get_read_handle(
        &self,
        engine: &dyn DynamicEngine,
        host_type: &HostType,
        member: &str,
    ) -> Result<ReadHandle, HostError> {
        check_member(member)?;
        Ok(read_through(
            &self.reads,
            &self.read_counters,
            engine,
            host_type,
            member,
            "read",
            || engine.negotiate_read(host_type, member),
        ))
    }

    /// Return the write site for `member` on `host_type`, negotiating it with
    /// `engine` on first use.
    pub fn get_write_handle(
        &self,
        engine: &dyn DynamicEngine,
        host_type: &HostType,
        member: &str,
    ) -> Result<WriteHandle, HostError> {
        check_member(member)?;
        Ok(read_through(
            &self.writes,
            &self.write_counters,
            engine,
            host_type,
            member,
            "write",
            || engine.negotiate_write(host_type, member),
        ))
    }

    pub fn contains_read(&self, host_type: &HostType, member: &str) -> bool {
        contains(&self.reads, host_type, member)
    }

    pub fn contains_write(&self, host_type: &HostType, member: &str) -> bool {
        contains(&self.writes, host_type, member)
    }

    /// Keys of every negotiated read site, in no particular order.
    pub fn read_sites(&self) -> Vec<SiteKey> {
        keys(&self.reads)
    }

    /// Keys of every negotiated write site, in no particular order.
    pub fn write_sites(&self) -> Vec<SiteKey> {
        keys(&self.writes)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            read_negotiations: self.read_counters.negotiations.load(Ordering::Relaxed),
            write_negotiations: self.write_counters.negotiations.load(Ordering::Relaxed),
            read_hits: self.read_counters.hits.load(Ordering::Relaxed),
            write_hits: self.write_counters.hits.load(Ordering::Relaxed),
        }
    }
}

fn check_member(member: &str) -> Result<(), HostError> {
    if member.is_empty() {
        Err(HostError::attribute_error("attribute name must not be empty"))
    } else {
        Ok(())
    }
}

// The maps are only ever inserted into, so a panic while a lock was held
// cannot leave them half-updated; recovering from poison is safe.
fn read_through<H: Clone>(
    map: &SiteMap<H>,
    counters: &Counters,
    engine: &dyn DynamicEngine,
    host_type: &HostType,
    member: &str,
    direction: &str,
    negotiate: impl FnOnce() -> H,
) -> H {
    {
        let sites = map.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = sites.get(host_type).and_then(|by_name| by_name.get(member)) {
            counters.hits.fetch_add(1, Ordering::Relaxed);
            trace!("{} site hit for {}.{}", direction, host_type, member);
            return handle.clone();
        }
    }

    let mut sites = map.write().unwrap_or_else(PoisonError::into_inner);
    let by_name = sites.entry(*host_type).or_insert_with(HashMap::new);
    if let Some(handle) = by_name.get(member) {
        // Another caller negotiated this site between our two locks.
        counters.hits.fetch_add(1, Ordering::Relaxed);
        return handle.clone();
    }
    debug!(
        "{} negotiating {} site for {}.{}",
        engine.name(),
        direction,
        host_type,
        member
    );
    counters.negotiations.fetch_add(1, Ordering::Relaxed);
    let handle = negotiate();
    by_name.insert(member.to_string(), handle.clone());
    handle
}

fn contains<H>(map: &SiteMap<H>, host_type: &HostType, member: &str) -> bool {
    map.read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(host_type)
        .map_or(false, |by_name| by_name.contains_key(member))
}

fn keys<H>(map: &SiteMap<H>) -> Vec<SiteKey> {
    let sites = map.read().unwrap_or_else(PoisonError::into_inner);
    sites
        .iter()
        .flat_map(|(host_type, by_name)| {
            by_name.keys().map(move |member| SiteKey {
                host_type: *host_type,
                member: member.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::engine::{ReadSite, WriteSite};
    use crate::dynamic::types::{DynamicError, NativeInstance, RawValue};

    struct Widget;
    struct Gadget;

    struct ConstSite(i64);

    impl ReadSite for ConstSite {
        fn invoke(&self, _instance: &dyn NativeInstance) -> Result<RawValue, DynamicError> {
            Ok(Box::new(self.0))
        }
    }

    struct NoopSite;

    impl WriteSite for NoopSite {
        fn invoke(&self, _instance: &dyn NativeInstance, _value: RawValue) -> Result<(), DynamicError> {
            Ok(())
        }
    }

    /// Hands out a fresh site per negotiation, numbered in order.
    struct Numbering {
        next: AtomicUsize,
    }

    impl DynamicEngine for Numbering {
        fn negotiate_read(&self, _host_type: &HostType, _member: &str) -> ReadHandle {
            let n = self.next.fetch_add(1, Ordering::SeqCst);
            Arc::new(ConstSite(n as i64))
        }

        fn negotiate_write(&self, _host_type: &HostType, _member: &str) -> WriteHandle {
            self.next.fetch_add(1, Ordering::SeqCst);
            Arc::new(NoopSite)
        }
    }

    fn engine() -> Numbering {
        Numbering {
            next: AtomicUsize::new(0),
        }
    }

    fn read_value(handle: &ReadHandle) -> i64 {
        let raw = handle.invoke(&Widget).unwrap();
        *raw.downcast::<i64>().unwrap()
    }

    #[test]
    fn test_read_miss_then_hit() {
        let cache = DispatchSiteCache::new();
        let engine = engine();
        let ty = HostType::of::<Widget>();

        let first = cache.get_read_handle(&engine, &ty, "size").unwrap();
        let second = cache.get_read_handle(&engine, &ty, "size").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(read_value(&second), 0);
        assert_eq!(
            cache.stats(),
            CacheStats {
                read_negotiations: 1,
                read_hits: 1,
                ..CacheStats::default()
            }
        );
    }

    #[test]
    fn test_keys_distinguish_type_and_member() {
        let cache = DispatchSiteCache::new();
        let engine = engine();
        let widget = HostType::of::<Widget>();
        let gadget = HostType::of::<Gadget>();

        let a = cache.get_read_handle(&engine, &widget, "size").unwrap();
        let b = cache.get_read_handle(&engine, &gadget, "size").unwrap();
        let c = cache.get_read_handle(&engine, &widget, "color").unwrap();

        assert_eq!((read_value(&a), read_value(&b), read_value(&c)), (0, 1, 2));
        assert_eq!(cache.stats().read_negotiations, 3);
        assert_eq!(cache.read_sites().len(), 3);
    }

    #[test]
    fn test_reads_and_writes_are_negotiated_independently() {
        let cache = DispatchSiteCache::new();
        let engine = engine();
        let ty = HostType::of::<Widget>();

        cache.get_read_handle(&engine, &ty, "size").unwrap();
        assert!(cache.contains_read(&ty, "size"));
        assert!(!cache.contains_write(&ty, "size"));

        cache.get_write_handle(&engine, &ty, "size").unwrap();
        cache.get_write_handle(&engine, &ty, "size").unwrap();
        assert!(cache.contains_write(&ty, "size"));

        let stats = cache.stats();
        assert_eq!(stats.read_negotiations, 1);
        assert_eq!(stats.write_negotiations, 1);
        assert_eq!(stats.write_hits, 1);
        assert_eq!(
            cache.write_sites(),
            vec![SiteKey {
                host_type: ty,
                member: "size".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_member_rejected_without_negotiation() {
        let cache = DispatchSiteCache::new();
        let engine = engine();
        let ty = HostType::of::<Widget>();

        let err = cache.get_read_handle(&engine, &ty, "").err().unwrap();
        assert!(err.is_not_found());
        assert!(cache.get_write_handle(&engine, &ty, "").is_err());
        assert_eq!(cache.stats(), CacheStats::default());
        assert_eq!(engine.next.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_global_sites_is_shared() {
        assert!(Arc::ptr_eq(&global_sites(), &global_sites()));
    }
}
