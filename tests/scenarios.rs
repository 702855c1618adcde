//! End-to-end scenarios against the on-disk `Table`, exercising open,
//! insert/lookup/update/delete, growth, reopen, and residency.

use diskhash::{AccessMode, CreateMode, Kind, Options, Table};
use tempfile::TempDir;

fn scratch() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("t.dht");
    (dir, path)
}

mod basic_insert_and_lookup {
    use super::*;

    #[test]
    fn two_keys_in_a_fresh_table() {
        let (_dir, path) = scratch();
        let mut t = Table::open(&path, Options::new(15, 1), AccessMode::ReadWrite, CreateMode::CreateIfMissing).unwrap();
        assert!(t.insert(b"alpha", &[0x01]).unwrap());
        assert!(t.insert(b"beta", &[0x02]).unwrap());
        assert_eq!(t.size(), 2);
        assert_eq!(t.lookup(b"alpha"), Some(&[0x01][..]));
        assert_eq!(t.lookup(b"gamma"), None);
    }
}

mod growth_and_rehash_at_scale {
    use super::*;

    #[test]
    fn ten_thousand_keys_then_delete_every_even_one() {
        let (_dir, path) = scratch();
        let mut t = Table::open(&path, Options::new(16, 8), AccessMode::ReadWrite, CreateMode::CreateIfMissing).unwrap();

        for i in 0..10_000u32 {
            let key = format!("key-{i:06}");
            t.insert(key.as_bytes(), &(i as u64).to_le_bytes()).unwrap();
        }
        assert_eq!(t.size(), 10_000);
        assert_eq!(t.slots_used(), 10_000);

        for i in (0..10_000u32).step_by(2) {
            let key = format!("key-{i:06}");
            assert!(t.delete(key.as_bytes()).unwrap());
        }
        assert_eq!(t.size(), 5_000);
        assert_eq!(t.slots_used(), 10_000);

        let cap = t.reserve(20_000).unwrap();
        assert!(cap >= 20_000);
        assert_eq!(t.slots_used(), 5_000);

        for i in (1..10_000u32).step_by(2) {
            let key = format!("key-{i:06}");
            assert_eq!(t.lookup(key.as_bytes()), Some((i as u64).to_le_bytes().as_slice()));
        }
        for i in (0..10_000u32).step_by(2) {
            let key = format!("key-{i:06}");
            assert_eq!(t.lookup(key.as_bytes()), None);
        }
    }

    #[test]
    fn crossing_the_load_factor_threshold_doubles_capacity() {
        let (_dir, path) = scratch();
        let mut t = Table::open(&path, Options::new(15, 4), AccessMode::ReadWrite, CreateMode::CreateIfMissing).unwrap();
        let initial_capacity = t.capacity();
        let to_insert = (initial_capacity * 7 / 10) + 1;
        for i in 0..to_insert {
            t.insert(format!("k{i}").as_bytes(), &(i as u32).to_le_bytes()).unwrap();
        }
        assert_eq!(t.capacity(), initial_capacity * 2);
        for i in 0..to_insert {
            assert_eq!(t.lookup(format!("k{i}").as_bytes()), Some((i as u32).to_le_bytes().as_slice()));
        }
    }
}

mod read_only_handles {
    use super::*;

    #[test]
    fn mutation_is_rejected_but_lookup_still_works() {
        let (_dir, path) = scratch();
        {
            let mut t = Table::open(&path, Options::new(15, 1), AccessMode::ReadWrite, CreateMode::CreateIfMissing).unwrap();
            t.insert(b"alpha", &[7]).unwrap();
            t.free().unwrap();
        }
        let mut t = Table::open(&path, Options::default(), AccessMode::ReadOnly, CreateMode::MustExist).unwrap();
        assert_eq!(t.lookup(b"alpha"), Some(&[7][..]));
        let err = t.insert(b"beta", &[1]).unwrap_err();
        assert_eq!(err.kind(), Kind::PermissionDenied);
    }

    #[test]
    fn load_to_memory_then_second_call_reports_impossible_operation() {
        let (_dir, path) = scratch();
        {
            let mut t = Table::open(&path, Options::new(15, 1), AccessMode::ReadWrite, CreateMode::CreateIfMissing).unwrap();
            t.insert(b"alpha", &[9]).unwrap();
            t.free().unwrap();
        }
        let mut t = Table::open(&path, Options::default(), AccessMode::ReadOnly, CreateMode::MustExist).unwrap();
        t.load_to_memory().unwrap();
        assert_eq!(t.lookup(b"alpha"), Some(&[9][..]));
        let err = t.load_to_memory().unwrap_err();
        assert_eq!(err.kind(), Kind::ImpossibleOperation);
        // Handle stays usable for reads after the rejected second call.
        assert_eq!(t.lookup(b"alpha"), Some(&[9][..]));
    }

    #[test]
    fn load_to_memory_on_writable_handle_is_rejected() {
        let (_dir, path) = scratch();
        let mut t = Table::open(&path, Options::new(15, 1), AccessMode::ReadWrite, CreateMode::CreateIfMissing).unwrap();
        let err = t.load_to_memory().unwrap_err();
        assert_eq!(err.kind(), Kind::ImpossibleOperation);
    }
}

mod indexed_lookup_in_insertion_order {
    use super::*;

    #[test]
    fn five_inserts_no_deletes_round_trip_in_order() {
        let (_dir, path) = scratch();
        let mut t = Table::open(&path, Options::new(15, 1), AccessMode::ReadWrite, CreateMode::CreateIfMissing).unwrap();
        let keys = ["a", "b", "c", "d", "e"];
        for (i, k) in keys.iter().enumerate() {
            t.insert(k.as_bytes(), &[i as u8]).unwrap();
        }
        for (i, k) in keys.iter().enumerate() {
            let (got_key, got_data) = t.indexed_lookup(i as u64).unwrap();
            assert_eq!(got_key, k.as_bytes());
            assert_eq!(got_data, vec![i as u8]);
        }
    }

    #[test]
    fn deleted_ordinal_reports_vacant_not_invalid_argument() {
        let (_dir, path) = scratch();
        let mut t = Table::open(&path, Options::new(15, 1), AccessMode::ReadWrite, CreateMode::CreateIfMissing).unwrap();
        t.insert(b"alpha", &[1]).unwrap();
        t.delete(b"alpha").unwrap();
        let err = t.indexed_lookup(0).unwrap_err();
        assert_eq!(err.kind(), Kind::Vacant);
    }

    #[test]
    fn out_of_range_ordinal_is_invalid_argument() {
        let (_dir, path) = scratch();
        let t = Table::open(&path, Options::new(15, 1), AccessMode::ReadWrite, CreateMode::CreateIfMissing).unwrap();
        let err = t.indexed_lookup(0).unwrap_err();
        assert_eq!(err.kind(), Kind::InvalidArgument);
    }

    #[test]
    fn iterator_skips_deleted_records() {
        let (_dir, path) = scratch();
        let mut t = Table::open(&path, Options::new(15, 1), AccessMode::ReadWrite, CreateMode::CreateIfMissing).unwrap();
        t.insert(b"a", &[1]).unwrap();
        t.insert(b"b", &[2]).unwrap();
        t.insert(b"c", &[3]).unwrap();
        t.delete(b"b").unwrap();
        let keys: Vec<Vec<u8>> = t.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![b"a".to_vec(), b"c".to_vec()]);
    }
}

mod boundary_behaviors {
    use super::*;

    #[test]
    fn key_of_length_maxlen_rejected_maxlen_minus_one_accepted() {
        let (_dir, path) = scratch();
        let mut t = Table::open(&path, Options::new(8, 1), AccessMode::ReadWrite, CreateMode::CreateIfMissing).unwrap();
        let too_long = vec![b'x'; 8];
        let err = t.insert(&too_long, &[0]).unwrap_err();
        assert_eq!(err.kind(), Kind::InvalidArgument);

        let just_right = vec![b'x'; 7];
        assert!(t.insert(&just_right, &[0]).unwrap());
    }

    #[test]
    fn duplicate_insert_is_a_no_op() {
        let (_dir, path) = scratch();
        let mut t = Table::open(&path, Options::new(15, 1), AccessMode::ReadWrite, CreateMode::CreateIfMissing).unwrap();
        assert!(t.insert(b"alpha", &[1]).unwrap());
        assert!(!t.insert(b"alpha", &[9]).unwrap());
        assert_eq!(t.lookup(b"alpha"), Some(&[1][..]));
        assert_eq!(t.size(), 1);
    }

    #[test]
    fn delete_then_reinsert_of_same_key_succeeds_both_times() {
        let (_dir, path) = scratch();
        let mut t = Table::open(&path, Options::new(15, 1), AccessMode::ReadWrite, CreateMode::CreateIfMissing).unwrap();
        assert!(t.insert(b"alpha", &[1]).unwrap());
        assert!(t.delete(b"alpha").unwrap());
        assert!(t.insert(b"alpha", &[2]).unwrap());
        assert_eq!(t.lookup(b"alpha"), Some(&[2][..]));
    }

    #[test]
    fn open_with_zero_zero_options_infers_from_disk() {
        let (_dir, path) = scratch();
        {
            let t = Table::open(&path, Options::new(15, 4), AccessMode::ReadWrite, CreateMode::CreateIfMissing).unwrap();
            t.free().unwrap();
        }
        let t = Table::open(&path, Options::default(), AccessMode::ReadWrite, CreateMode::MustExist).unwrap();
        assert_eq!(t.capacity(), 8);
    }

    #[test]
    fn open_with_mismatched_options_fails() {
        let (_dir, path) = scratch();
        {
            let t = Table::open(&path, Options::new(15, 4), AccessMode::ReadWrite, CreateMode::CreateIfMissing).unwrap();
            t.free().unwrap();
        }
        let err = Table::open(&path, Options::new(15, 99), AccessMode::ReadWrite, CreateMode::MustExist).unwrap_err();
        assert_eq!(err.kind(), Kind::InvalidArgument);
    }

    #[test]
    fn reserve_below_current_capacity_is_a_no_op() {
        let (_dir, path) = scratch();
        let mut t = Table::open(&path, Options::new(15, 4), AccessMode::ReadWrite, CreateMode::CreateIfMissing).unwrap();
        let before = t.capacity();
        assert_eq!(t.reserve(1).unwrap(), before);
        assert_eq!(t.capacity(), before);
    }
}

mod persistence_across_reopen {
    use super::*;

    #[test]
    fn reopening_after_free_preserves_surviving_keys() {
        let (_dir, path) = scratch();
        {
            let mut t = Table::open(&path, Options::new(15, 1), AccessMode::ReadWrite, CreateMode::CreateIfMissing).unwrap();
            t.insert(b"alpha", &[1]).unwrap();
            t.insert(b"beta", &[2]).unwrap();
            t.delete(b"alpha").unwrap();
            t.free().unwrap();
        }
        let t = Table::open(&path, Options::default(), AccessMode::ReadWrite, CreateMode::MustExist).unwrap();
        assert_eq!(t.size(), 1);
        assert_eq!(t.lookup(b"alpha"), None);
        assert_eq!(t.lookup(b"beta"), Some(&[2][..]));
    }
}

mod lookup_mut_in_place_update {
    use super::*;

    #[test]
    fn mutating_the_returned_view_is_visible_on_the_next_lookup() {
        let (_dir, path) = scratch();
        let mut t = Table::open(&path, Options::new(15, 4), AccessMode::ReadWrite, CreateMode::CreateIfMissing).unwrap();
        t.insert(b"counter", &0u32.to_le_bytes()).unwrap();
        {
            let view = t.lookup_mut(b"counter").unwrap().unwrap();
            let val = u32::from_le_bytes(view.try_into().unwrap());
            view.copy_from_slice(&(val + 1).to_le_bytes());
        }
        assert_eq!(t.lookup(b"counter"), Some(1u32.to_le_bytes().as_slice()));
    }
}
