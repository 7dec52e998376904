/// Merge two sorted runs and a single extra item into one sorted `Vec`.
///
/// Assumes that the runs and `extra` are pairwise distinct.
pub fn merge<T: Ord + Copy>(a: &[T], extra: T, b: &[T]) -> Vec<T> {
    let mut res = Vec::with_capacity(a.len() + b.len() + 1);
    let mut extra = Some(extra);
    let (mut i, mut j) = (0, 0);

    macro_rules! push_extra_below {
        ($bound: expr) => {
            if let Some(e) = extra {
                if e < $bound {
                    res.push(e);
                    extra = None;
                }
            }
        };
    }

    while i < a.len() && j < b.len() {
        let next = if a[i] < b[j] {
            i += 1;
            a[i - 1]
        } else {
            j += 1;
            b[j - 1]
        };
        push_extra_below!(next);
        res.push(next);
    }
    for &next in a[i..].iter().chain(b[j..].iter()) {
        push_extra_below!(next);
        res.push(next);
    }
    if let Some(e) = extra {
        res.push(e);
    }

    debug_assert!(res.windows(2).all(|w| w[0] < w[1]));
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_interleaved_runs() {
        let res = merge(&[1, 4, 9], 5, &[2, 3, 10]);
        assert_eq!(res, vec![1, 2, 3, 4, 5, 9, 10]);
    }

    #[test]
    fn extra_at_either_end() {
        assert_eq!(merge(&[2, 3], 1, &[4]), vec![1, 2, 3, 4]);
        assert_eq!(merge(&[2, 3], 7, &[4]), vec![2, 3, 4, 7]);
    }

    #[test]
    fn empty_runs() {
        assert_eq!(merge::<i32>(&[], 1, &[]), vec![1]);
        assert_eq!(merge(&[], 3, &[1, 5]), vec![1, 3, 5]);
        assert_eq!(merge(&[1, 5], 3, &[]), vec![1, 3, 5]);
    }
}
