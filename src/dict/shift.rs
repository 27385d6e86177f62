//! In-place tail relocation
//!
//! When a value's length changes, every byte from just after the old value
//! through the end of the sector image moves by the length delta in one
//! block move, treating the update as an insert-or-delete on a packed array.
//! Keys never move; only the tail behind the rewritten value does.

/// Move `image[from..]` so that it starts at `to` instead.
///
/// The move is overlap-safe in both directions (`copy_within` has memmove
/// semantics). When moving forward, bytes pushed past the end of the image
/// are discarded — the caller's capacity check guarantees they are free
/// space. When moving backward, the vacated tail keeps its previous
/// contents, which by the sector invariant is erased-state 0xFF.
pub fn shift_tail(image: &mut [u8], from: usize, to: usize) {
    if from == to {
        return;
    }

    let len = image.len();
    if to > from {
        // Growing: drop the bytes that no longer fit
        let count = len - to;
        image.copy_within(from..from + count, to);
    } else {
        // Shrinking: the whole tail moves down
        image.copy_within(from..len, to);
    }
}
