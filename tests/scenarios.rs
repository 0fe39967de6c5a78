// ==============================================
// END-TO-END SCENARIOS (integration)
// ==============================================
//
// Short, fully traced access sequences whose outcome is known exactly.

use ghostcache::prelude::*;

fn keys<V>(items: &[Item<V>]) -> Vec<Key> {
    items.iter().map(|item| item.key).collect()
}

// ==============================================
// LRU
// ==============================================

#[test]
fn lru_capacity_two_drops_oldest() {
    let mut cache = LruCore::new(2);
    cache.put(1, "a");
    cache.put(2, "b");
    cache.put(3, "c");

    assert_eq!(cache.get(&1), None);
    assert_eq!(cache.get(&3), Some(&"c"));
    assert_eq!(cache.len(), 2);
}

#[test]
fn lru_get_refreshes_recency() {
    let mut cache = LruCore::new(2);
    cache.put(1, "a");
    cache.put(2, "b");
    cache.get(&1);
    cache.put(3, "c");

    let mut resident = keys(&cache.items());
    resident.sort_unstable();
    assert_eq!(resident, vec![1, 3]);
}

// ==============================================
// 2Q
// ==============================================

#[test]
fn two_q_scan_does_not_flush_frequent_keys() {
    let mut cache = TwoQCache::new(8);
    for key in 0..4 {
        cache.put(key, key);
        cache.get(&key);
    }
    for key in 100..200 {
        cache.put(key, key);
    }
    for key in 0..4 {
        assert_eq!(cache.get(&key), Some(&key), "hot key {} was flushed", key);
    }
    cache.check_invariants().unwrap();
}

#[test]
fn two_q_evicted_key_returns_straight_to_frequent() {
    let mut cache = TwoQCache::new(4);
    for key in 1..=4 {
        cache.put(key, key);
        assert_eq!(cache.queue_of(&key), Some(TwoQQueue::Recent));
    }

    cache.put(5, 5);
    let ghosts: Vec<Key> = (1..=5)
        .filter(|key| cache.queue_of(key) == Some(TwoQQueue::Ghost))
        .collect();
    assert_eq!(ghosts, vec![1]);

    cache.put(1, 100);
    assert_eq!(cache.queue_of(&1), Some(TwoQQueue::Frequent));
    assert_eq!(cache.peek(&1), Some(&100));
    assert_eq!(cache.len(), 4);
}

#[test]
fn two_q_items_put_recent_before_frequent() {
    let mut cache = TwoQCache::new(10);
    cache.put(1, 'a');
    cache.put(2, 'b');
    cache.get(&2);
    cache.put(3, 'c');

    assert_eq!(keys(&cache.items()), vec![3, 1, 2]);
}

// ==============================================
// ARC
// ==============================================

#[test]
fn arc_ghost_hits_tune_p_both_ways() {
    let mut cache = ArcCache::new(2);
    cache.put(1, 1);
    cache.put(2, 2);
    cache.put(3, 3);
    cache.get(&3);
    assert_eq!(cache.list_of(&1), Some(ArcList::B1));

    let before = cache.p_value();
    cache.put(1, 1);
    assert!(cache.p_value() > before);
    assert_eq!(cache.list_of(&3), Some(ArcList::B2));

    let before = cache.p_value();
    cache.put(3, 3);
    assert!(cache.p_value() < before);
    assert_eq!(cache.list_of(&3), Some(ArcList::T2));
    cache.check_invariants().unwrap();
}

#[test]
fn arc_repeated_working_set_migrates_to_t2() {
    let mut cache = ArcCache::new(16);
    for _ in 0..3 {
        for key in 0..8 {
            if cache.get(&key).is_none() {
                cache.put(key, key);
            }
        }
    }
    assert_eq!(cache.t2_len(), 8);
    assert_eq!(cache.t1_len(), 0);

    for key in 1000..1032 {
        cache.put(key, key);
    }
    for key in 0..8 {
        assert_eq!(cache.peek(&key), Some(&key));
    }
    cache.check_invariants().unwrap();
}

// ==============================================
// Shared surface
// ==============================================

#[test]
fn remove_and_purge_behave_the_same_everywhere() {
    for policy in [CachePolicy::Lru, CachePolicy::two_q(), CachePolicy::Arc] {
        let mut cache: Cache<&str> = CacheBuilder::new(4).build(policy);
        cache.put(1, "a");
        cache.put(2, "b");

        assert!(cache.remove(&1), "{:?}", policy);
        assert!(!cache.remove(&1), "{:?}", policy);
        assert_eq!(cache.len(), 1, "{:?}", policy);

        cache.purge();
        assert_eq!(cache.len(), 0, "{:?}", policy);
        assert_eq!(cache.get(&2), None, "{:?}", policy);
    }
}
