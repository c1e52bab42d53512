/**
This trait abstracts where the bytes of a string actually live

Every string owns exactly one block, which is always `len + free + 1` bytes long
(the extra byte holds the terminating zero).
Allocators hand out such blocks, resize them and take them back.

## Example usage

```
use sds_buf::{Allocator, Sds, VecAlloc};

# fn main() -> sds_buf::Result<()> {
let alloc = VecAlloc;
let mut block = alloc.allocate(4)?;
block.copy_from_slice(b"foo\0");

// growing keeps everything that was already there
alloc.reallocate(&mut block, 8)?;
assert_eq!(&block[..4], b"foo\0");
alloc.release(block);

// strings do all of the above on their own
let s = Sds::builder().alloc(alloc).build(b"foo")?;
assert_eq!(s.as_bytes_with_nul(), b"foo\0");
# Ok(())
# }
```
*/
pub trait Allocator {
	/// Chunk of memory handed out by this allocator
	type Block: AsRef<[u8]> + AsMut<[u8]>;
	/// Allocate block of exactly `size` bytes with unspecified content.
	fn allocate(&self, size: usize) -> Result<Self::Block, Error>;
	/// Allocate block of exactly `size` bytes, all of which are zero.
	fn allocate_zeroed(&self, size: usize) -> Result<Self::Block, Error>;
	/**
	Resize `block` to exactly `size` bytes, keeping up to `min(old size, size)` bytes of its content.

	If this fails, `block` must be left intact.
	*/
	fn reallocate(&self, block: &mut Self::Block, size: usize) -> Result<(), Error>;
	/// Take the block back.
	fn release(&self, block: Self::Block) {
		drop(block)
	}
}

// lets several strings (or tests) share one stateful allocator
impl<'a, A: Allocator> Allocator for &'a A {
	type Block = A::Block;
	fn allocate(&self, size: usize) -> Result<Self::Block, Error> {
		(**self).allocate(size)
	}
	fn allocate_zeroed(&self, size: usize) -> Result<Self::Block, Error> {
		(**self).allocate_zeroed(size)
	}
	fn reallocate(&self, block: &mut Self::Block, size: usize) -> Result<(), Error> {
		(**self).reallocate(block, size)
	}
	fn release(&self, block: Self::Block) {
		(**self).release(block)
	}
}

use crate::Error;

mod vec;
pub use vec::*;

mod mmap;
pub use mmap::*;

#[cfg(test)]
mod probe;
#[cfg(test)]
pub(crate) use probe::*;
