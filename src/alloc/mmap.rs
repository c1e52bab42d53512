/*
slice-deque only gives us mirrored buffers:
the same pages are mapped twice in a row,
and `len()` reports the size of both mirrors together.
We only ever touch the first half, and keep its usable size on our own.

On top of that, slice-deque rounds requested size up to the page size (or something),
so a block can usually be grown in place without remapping anything.
That makes this allocator a poor fit for lots of short strings,
but a decent one for few large ones that keep growing.
*/
use slice_deque::Buffer;
use crate::Error;

/// Page-mapped allocator backed by slice-deque's mirrored buffers
#[derive(Debug, Default, Clone, Copy)]
pub struct MmapAlloc;

pub struct MmapBlock {
	buf: Buffer<u8>,
	// bytes of the first mirror that belong to this block
	size: usize,
}

impl MmapBlock {
	// number of bytes block can hold without remapping
	fn room(&self) -> usize {
		self.buf.len() / 2
	}
}

impl AsRef<[u8]> for MmapBlock {
	fn as_ref(&self) -> &[u8] {
		&(unsafe {
			self.buf.as_slice()
		})[ .. self.size ]
	}
}
impl AsMut<[u8]> for MmapBlock {
	fn as_mut(&mut self) -> &mut [u8] {
		let size = self.size;
		&mut (unsafe {
			self.buf.as_mut_slice()
		})[ .. size ]
	}
}

impl MmapAlloc {
	fn map(&self, size: usize) -> Result<MmapBlock, Error> {
		// mirrored buffer cannot be empty
		let half = std::cmp::max(size, 1);
		// no mapping can be that large, and slice-deque would overflow while rounding it to pages
		if half > isize::MAX as usize / 2 {
			return Err(Error::Alloc(size));
		}
		let buf = Buffer::uninitialized(half * 2)
			.map_err(|_| Error::Alloc(size))?;
		Ok(MmapBlock { buf, size })
	}
}

impl super::Allocator for MmapAlloc {
	type Block = MmapBlock;
	fn allocate(&self, size: usize) -> Result<MmapBlock, Error> {
		self.map(size)
	}
	fn allocate_zeroed(&self, size: usize) -> Result<MmapBlock, Error> {
		let mut block = self.map(size)?;
		block.as_mut().fill(0);
		Ok(block)
	}
	fn reallocate(&self, block: &mut MmapBlock, size: usize) -> Result<(), Error> {
		if size <= block.room() {
			// there's plenty of room in the mapping already
			block.size = size;
			return Ok(());
		}
		let mut new = self.map(size)?;
		// move data at the start of new mapping
		let old = block.size;
		new.as_mut()[ .. old ].copy_from_slice(block.as_ref());
		*block = new;
		Ok(())
	}
}
