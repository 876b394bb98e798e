use rand::Rng;

/// Pick one index uniformly from `[0, size)`, or `None` for an empty audience.
pub(crate) fn pick_index<R: Rng + ?Sized>(rng: &mut R, size: usize) -> Option<usize> {
    if size == 0 {
        return None;
    }
    Some(rng.gen_range(0..size))
}
