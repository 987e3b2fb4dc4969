use std::cmp::Ordering;

/// Strict total order over keys.
///
/// Two keys are considered equal when neither orders before the other.
pub trait Compare<K: ?Sized> {
    fn less(&self, a: &K, b: &K) -> bool;

    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        if self.less(a, b) {
            Ordering::Less
        } else if self.less(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// The key type's own [`Ord`].
#[derive(Clone, Copy, Default, Debug)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }

    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural() {
        assert!(Natural.less(&1, &2));
        assert!(!Natural.less(&2, &2));
        assert_eq!(Natural.compare("b", "a"), Ordering::Greater);
    }

    #[test]
    fn test_closure_derives_equality() {
        let by_abs = |a: &i32, b: &i32| a.abs() < b.abs();
        assert_eq!(by_abs.compare(&-3, &3), Ordering::Equal);
        assert_eq!(by_abs.compare(&-4, &3), Ordering::Greater);
        assert_eq!(by_abs.compare(&1, &-2), Ordering::Less);
    }
}
