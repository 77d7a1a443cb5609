use crate::error::Error;

/// Clamps caller supplied inclusive bounds to `[0, len - 1]`.
///
/// Returns `None` if the clamped interval is empty.
#[inline]
pub(crate) fn clamp(left: isize, right: isize, len: usize) -> Option<(usize, usize)> {
    if len == 0 || right < 0 || left > right {
        return None;
    }
    let left = left.max(0) as usize;
    let right = (right as usize).min(len - 1);
    (left <= right).then_some((left, right))
}

/// Validates a point index, which is never clamped.
#[inline]
pub(crate) fn check_index(index: isize, len: usize) -> Result<usize, Error> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or(Error::IndexOutOfRange { index, len })
}

/// Midpoint of the inclusive interval `[left, right]`.
#[inline(always)]
pub(crate) fn mid(left: usize, right: usize) -> usize {
    left + (right - left) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(0, 4, 5), Some((0, 4)));
        assert_eq!(clamp(-3, 2, 5), Some((0, 2)));
        assert_eq!(clamp(3, 100, 5), Some((3, 4)));
        assert_eq!(clamp(isize::MIN, isize::MAX, 5), Some((0, 4)));
        assert_eq!(clamp(5, 2, 5), None);
        assert_eq!(clamp(5, 9, 5), None);
        assert_eq!(clamp(-4, -1, 5), None);
        assert_eq!(clamp(0, 0, 1), Some((0, 0)));
    }

    #[test]
    fn index_check() {
        assert_eq!(check_index(0, 3), Ok(0));
        assert_eq!(check_index(2, 3), Ok(2));
        assert_eq!(
            check_index(3, 3),
            Err(Error::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(
            check_index(-1, 3),
            Err(Error::IndexOutOfRange { index: -1, len: 3 })
        );
    }

    #[test]
    fn midpoint() {
        assert_eq!(mid(0, 4), 2);
        assert_eq!(mid(3, 4), 3);
        assert_eq!(mid(7, 7), 7);
    }
}
