use parallel_cipher::prelude::*;
use proptest::prelude::*;

fn document() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[ -~]{0,40}", 0..60)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn inverse_shift_restores_line(line in "[ -~]{0,80}", shift in any::<i32>()) {
        let shift = i64::from(shift);
        prop_assert_eq!(transform(&transform(&line, shift), -shift), line);
    }

    #[test]
    fn cipher_inverse_covers_every_shift(line in "[ -~]{0,80}", shift in any::<i64>()) {
        let cipher = CaesarCipher::new(shift);
        prop_assert_eq!(cipher.inverse().apply(&cipher.apply(&line)), line);
    }

    #[test]
    fn non_alphanumeric_passes_through(line in "[^A-Za-z0-9]{0,40}", shift in -1000i64..1000) {
        prop_assert_eq!(transform(&line, shift), line);
    }

    #[test]
    fn transform_keeps_character_classes(line in "\\PC{0,40}", shift in any::<i64>()) {
        let out = transform(&line, shift);
        prop_assert_eq!(out.chars().count(), line.chars().count());
        for (a, b) in line.chars().zip(out.chars()) {
            prop_assert_eq!(a.is_ascii_uppercase(), b.is_ascii_uppercase());
            prop_assert_eq!(a.is_ascii_lowercase(), b.is_ascii_lowercase());
            prop_assert_eq!(a.is_ascii_digit(), b.is_ascii_digit());
        }
    }

    #[test]
    fn partitions_cover_every_index_once(items in 0usize..500, workers in 1usize..64) {
        let parts = partition(items, workers).unwrap();
        prop_assert_eq!(parts.len(), workers);

        let mut next = 0;
        for (i, p) in parts.iter().enumerate() {
            prop_assert_eq!(p.index, i);
            prop_assert_eq!(p.start, next);
            prop_assert!(p.start <= p.end);
            next = p.end;
        }
        prop_assert_eq!(next, items);

        let base = items / workers;
        for p in &parts[..workers - 1] {
            prop_assert_eq!(p.len(), base);
        }
        prop_assert_eq!(parts[workers - 1].len(), base + items % workers);
    }

    #[test]
    fn parallel_equals_sequential(lines in document(), shift in -50i64..50) {
        let cipher = CaesarCipher::new(shift);
        let expected = sequential_transform(&lines, &cipher);
        let n = lines.len();

        for workers in [1, 2, n.max(1), n + 5] {
            let pool = WorkerPool::new(PoolConfig::new().with_num_workers(workers)).unwrap();
            prop_assert_eq!(&pool.transform(&lines, &cipher).unwrap(), &expected);
        }
    }

    #[test]
    fn two_level_reduction_equals_single_pass(lines in document(), workers in 1usize..12) {
        let pool = WorkerPool::new(PoolConfig::new().with_num_workers(workers)).unwrap();
        let expected = longest_line(&lines).map(str::to_owned);
        prop_assert_eq!(pool.longest_line(&lines).unwrap(), expected);
    }
}

#[test]
fn documented_scenarios() {
    let lines: Vec<String> = ["ABC", "xyz9", "Hello, World!"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(
        sequential_transform(&lines, &CaesarCipher::new(3)),
        ["DEF", "abc2", "Khoor, Zruog!"]
    );

    let bounds: Vec<(usize, usize)> = partition(10, 3)
        .unwrap()
        .iter()
        .map(|p| (p.start, p.end))
        .collect();
    assert_eq!(bounds, vec![(0, 3), (3, 6), (6, 10)]);

    let lines: Vec<String> = ["a", "abc", "ab"].iter().map(|s| s.to_string()).collect();
    for workers in 1..=4 {
        let pool = WorkerPool::new(PoolConfig::new().with_num_workers(workers)).unwrap();
        assert_eq!(pool.longest_line(&lines).unwrap().as_deref(), Some("abc"));
    }
}
