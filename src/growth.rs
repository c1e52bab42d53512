/*!
Growth policy: how much to allocate when a string runs out of spare room.

Small strings double (bounding the number of reallocations to O(log n) over n appended bytes),
large ones grow by a fixed amount (bounding wasted memory by that amount).
*/
use crate::{Error, Result};

/// Default size at which strings stop doubling and start growing by this much instead
pub const MAX_PREALLOC: usize = 1024 * 1024;

/// Outcome of [`Sds::make_room_for()`](../struct.Sds.html#method.make_room_for)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Room {
	/// There was enough spare room already, nothing was touched
	Available,
	/// Block was reallocated, and might've been moved elsewhere
	Reallocated {
		/// block size before (terminator included)
		old_size: usize,
		/// block size after (terminator included)
		new_size: usize,
	},
}

/**
Length (terminator excluded) a string of length `len` should be reallocated to
so that `addlen` more bytes fit in it, given preallocation `threshold`.

```
use sds_buf::growth::target_len;

assert_eq!(target_len(5, 10, 1024).unwrap(), 30);
assert_eq!(target_len(1000, 24, 1024).unwrap(), 2048);
```
*/
pub fn target_len(len: usize, addlen: usize, threshold: usize) -> Result<usize> {
	let min = len.checked_add(addlen).ok_or(Error::Overflow)?;
	let target = if min < threshold {
		min.checked_mul(2)
	} else {
		min.checked_add(threshold)
	};
	target.ok_or(Error::Overflow)
}
