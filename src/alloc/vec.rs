use crate::Error;

/**
Heap allocator backed by plain `Vec<u8>`

Reservations go through `try_reserve_exact()`,
so running out of memory is reported as [`Error::Alloc`](../enum.Error.html) instead of aborting the process.
*/
#[derive(Debug, Default, Clone, Copy)]
pub struct VecAlloc;

impl super::Allocator for VecAlloc {
	type Block = Vec<u8>;
	// there's no safe way to hand out uninitialized bytes in a Vec,
	// hence this is the same as allocate_zeroed()
	fn allocate(&self, size: usize) -> Result<Vec<u8>, Error> {
		self.allocate_zeroed(size)
	}
	fn allocate_zeroed(&self, size: usize) -> Result<Vec<u8>, Error> {
		let mut buf = Vec::new();
		buf.try_reserve_exact(size)
			.map_err(|_| Error::Alloc(size))?;
		buf.resize(size, 0);
		Ok(buf)
	}
	fn reallocate(&self, buf: &mut Vec<u8>, size: usize) -> Result<(), Error> {
		if size > buf.len() {
			// capacity might be larger than len() already, so reserve relative to len()
			buf.try_reserve_exact(size - buf.len())
				.map_err(|_| Error::Alloc(size))?;
			buf.resize(size, 0);
		} else {
			buf.truncate(size);
			buf.shrink_to_fit();
		}
		Ok(())
	}
}
