/*!
Binary-safe, growable byte strings that are always followed by a zero byte.

[`Sds`](struct.Sds.html) keeps track of its length and of how much spare room it has,
so appending is amortized O(1),
while [`as_bytes_with_nul()`](struct.Sds.html#method.as_bytes_with_nul)
can be handed over to anything that expects NUL-terminated strings.
Content itself may contain zero bytes just fine.

## Example usage

```
use sds_buf::{Room, Sds};

# fn main() -> sds_buf::Result<()> {
let mut s = Sds::new_len(Some(b"foo"), 2)?;
s.append_text(b"bar")?;
assert_eq!(s.as_bytes_with_nul(), b"fobar\0");

// reserve some space before appending even more data
if let Room::Reallocated { .. } = s.make_room_for(10)? {
	// any slice borrowed from `s` before this point is gone by now,
	// as data might've been moved elsewhere
}
assert!(s.avail() >= 10);

// clearing keeps all the memory around for the next round
s.clear();
assert_eq!(s.len(), 0);
assert!(s.avail() >= 15);
# Ok(())
# }
```
*/

use std::cmp::Ordering;
use std::fmt;
use std::io;
use std::mem::ManuallyDrop;
use copy_in_place::copy_in_place;
use memchr::memchr;
use tracing::{debug, trace};

mod error;
pub use error::*;

mod alloc;
pub use self::alloc::{Allocator, VecAlloc, MmapAlloc, MmapBlock};

pub mod growth;
pub use growth::{Room, MAX_PREALLOC};

/**
Growable byte string

Block of memory underneath is always `len() + avail() + 1` bytes long,
and byte right after the content is always zero.
*/
pub struct Sds<A: Allocator = VecAlloc> {
	// released by hand in Drop, through the allocator
	buf: ManuallyDrop<A::Block>,
	len: usize,
	free: usize,
	prealloc: usize,
	alloc: A,
}

pub struct SdsBuilder<A> {
	alloc: A,
	prealloc: usize,
}
impl SdsBuilder<VecAlloc> {
	pub fn new() -> Self {
		SdsBuilder {
			alloc: VecAlloc,
			prealloc: MAX_PREALLOC,
		}
	}
}
impl Default for SdsBuilder<VecAlloc> {
	fn default() -> Self {
		Self::new()
	}
}
impl<A: Allocator> SdsBuilder<A> {
	/// Size past which strings stop doubling on growth and grow by this amount instead
	pub fn prealloc(mut self, threshold: usize) -> Self {
		self.prealloc = threshold;
		self
	}

	pub fn alloc<B: Allocator>(self, alloc: B) -> SdsBuilder<B> {
		SdsBuilder {
			alloc,
			prealloc: self.prealloc,
		}
	}

	/**
	Create string of length `len` out of the first `len` bytes of `init`,
	or out of `len` zero bytes if there's no `init`.

	No spare room is allocated.

	Panics if `init` is shorter than `len`.
	*/
	pub fn build_len(self, init: Option<&[u8]>, len: usize) -> Result<Sds<A>> {
		if let Some(init) = init {
			assert!(init.len() >= len, "{} bytes requested out of {}-byte init", len, init.len());
		}
		let size = len.checked_add(1).ok_or(Error::Overflow)?;
		let buf = match init {
			Some(_) => self.alloc.allocate(size),
			None => self.alloc.allocate_zeroed(size),
		};
		let mut buf = match buf {
			Ok(buf) => buf,
			Err(e) => {
				debug!(size, error = %e, "failed to allocate string");
				return Err(e);
			},
		};
		let bytes = AsMut::<[u8]>::as_mut(&mut buf);
		if let Some(init) = init {
			bytes[..len].copy_from_slice(&init[..len]);
		}
		bytes[len] = 0;

		Ok(Sds {
			buf: ManuallyDrop::new(buf),
			len, free: 0,
			prealloc: self.prealloc,
			alloc: self.alloc,
		})
	}

	pub fn build(self, init: &[u8]) -> Result<Sds<A>> {
		self.build_len(Some(init), init.len())
	}

	/// Like [`build()`](#method.build), but stops at the first zero byte; `None` yields an empty string
	pub fn build_text(self, text: Option<&[u8]>) -> Result<Sds<A>> {
		match text {
			Some(text) => self.build(until_nul(text)),
			None => self.build_empty(),
		}
	}

	pub fn build_empty(self) -> Result<Sds<A>> {
		self.build(b"")
	}
}

// returns bytes up to the first zero byte, or everything if there's none
fn until_nul(text: &[u8]) -> &[u8] {
	match memchr(0, text) {
		Some(n) => &text[..n],
		None => text,
	}
}

impl Sds<VecAlloc> {
	pub fn builder() -> SdsBuilder<VecAlloc> {
		SdsBuilder::new()
	}
	/// See [`SdsBuilder::build_len()`](struct.SdsBuilder.html#method.build_len)
	pub fn new_len(init: Option<&[u8]>, len: usize) -> Result<Self> {
		Self::builder().build_len(init, len)
	}
	pub fn from_bytes(init: &[u8]) -> Result<Self> {
		Self::builder().build(init)
	}
	/// See [`SdsBuilder::build_text()`](struct.SdsBuilder.html#method.build_text)
	pub fn from_text(text: Option<&[u8]>) -> Result<Self> {
		Self::builder().build_text(text)
	}
	pub fn empty() -> Result<Self> {
		Self::builder().build_empty()
	}
}

impl<A: Allocator> Sds<A> {
	pub fn new_len_in(init: Option<&[u8]>, len: usize, alloc: A) -> Result<Self> {
		SdsBuilder::new().alloc(alloc).build_len(init, len)
	}
	pub fn empty_in(alloc: A) -> Result<Self> {
		SdsBuilder::new().alloc(alloc).build_empty()
	}

	/// Create a copy of this string, with exactly as much memory as the content needs.
	pub fn dup(&self) -> Result<Self>
	where A: Clone
	{
		SdsBuilder {
			alloc: self.alloc.clone(),
			prealloc: self.prealloc,
		}.build(self.as_bytes())
	}

	fn block(&self) -> &[u8] {
		AsRef::<[u8]>::as_ref(&*self.buf)
	}
	fn block_mut(&mut self) -> &mut [u8] {
		AsMut::<[u8]>::as_mut(&mut *self.buf)
	}
	// put terminator right after the content
	fn terminate(&mut self) {
		let len = self.len;
		self.block_mut()[len] = 0;
	}

	/// Length of the content, terminator excluded
	pub fn len(&self) -> usize {
		self.len
	}
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}
	/// Number of bytes that can be appended without reallocation
	pub fn avail(&self) -> usize {
		self.free
	}
	/// `len() + avail()`
	pub fn capacity(&self) -> usize {
		self.len + self.free
	}
	/// Size of the block underneath, terminator included
	pub fn alloc_size(&self) -> usize {
		self.block().len()
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.block()[ .. self.len ]
	}
	/// Content followed by a zero byte
	pub fn as_bytes_with_nul(&self) -> &[u8] {
		&self.block()[ ..= self.len ]
	}
	/// Content that can be modified in place; length stays the same
	pub fn as_bytes_mut(&mut self) -> &mut [u8] {
		let len = self.len;
		&mut self.block_mut()[ .. len ]
	}

	/**
	Make string empty while keeping all of its memory as spare room.

	Never reallocates.
	*/
	pub fn clear(&mut self) {
		self.free += self.len;
		self.len = 0;
		self.terminate();
	}

	/**
	Make sure at least `addlen` more bytes can be appended without another reallocation.

	Does nothing (and says so by returning [`Room::Available`](growth/enum.Room.html)) if there's enough room already.
	Otherwise block is reallocated according to the [growth policy](growth/index.html).
	Content and length are never affected, and nothing at all changes if this fails.
	*/
	pub fn make_room_for(&mut self, addlen: usize) -> Result<Room> {
		if self.free >= addlen {
			return Ok(Room::Available);
		}
		let target = growth::target_len(self.len, addlen, self.prealloc)?;
		let new_size = target.checked_add(1).ok_or(Error::Overflow)?;
		let old_size = self.alloc_size();
		trace!(len = self.len, addlen, target, "growing string");

		if let Err(e) = self.alloc.reallocate(&mut *self.buf, new_size) {
			debug!(old_size, new_size, error = %e, "failed to grow string");
			return Err(e);
		}
		self.free = target - self.len;
		debug_assert_eq!(self.alloc_size(), self.len + self.free + 1);

		Ok(Room::Reallocated { old_size, new_size })
	}

	/// Append `data` to the end of the string
	pub fn append(&mut self, data: &[u8]) -> Result<()> {
		let n = data.len();
		self.make_room_for(n)?;
		let len = self.len;
		self.block_mut()[ len .. (len+n) ].copy_from_slice(data);
		self.len += n;
		self.free -= n;
		self.terminate();
		Ok(())
	}

	/// Append `text` up to its first zero byte (or all of it if there's none)
	pub fn append_text(&mut self, text: &[u8]) -> Result<()> {
		self.append(until_nul(text))
	}

	pub fn append_sds<B: Allocator>(&mut self, other: &Sds<B>) -> Result<()> {
		self.append(other.as_bytes())
	}

	/**
	Replace all of the content with `data`.

	Existing memory is reused if it can hold `data`, and is grown otherwise.
	*/
	pub fn copy_from(&mut self, data: &[u8]) -> Result<()> {
		let n = data.len();
		if self.capacity() < n {
			self.make_room_for(n - self.len)?;
		}
		let total = self.capacity();
		self.block_mut()[ .. n ].copy_from_slice(data);
		self.len = n;
		self.free = total - n;
		self.terminate();
		Ok(())
	}

	/// Like [`copy_from()`](#method.copy_from), but stops at the first zero byte of `text`
	pub fn copy_text(&mut self, text: &[u8]) -> Result<()> {
		self.copy_from(until_nul(text))
	}

	/// Pad string with zero bytes up to `len` bytes; does nothing if it's that long already
	pub fn grow_zero(&mut self, len: usize) -> Result<()> {
		let cur = self.len;
		if len <= cur {
			return Ok(());
		}
		self.make_room_for(len - cur)?;
		// spare room might hold leftovers of older content, terminator slot included
		self.block_mut()[ cur ..= len ].fill(0);
		self.free -= len - cur;
		self.len = len;
		Ok(())
	}

	/**
	Spare room right past the content.

	Use [`incr_len()`](#method.incr_len) to actually append data written to this slice,
	and [`make_room_for()`](#method.make_room_for) to make it bigger.
	*/
	pub fn spare_mut(&mut self) -> &mut [u8] {
		let (len, free) = (self.len, self.free);
		&mut self.block_mut()[ len .. (len+free) ]
	}

	/**
	Attach first `n` bytes of [`spare_mut()`](#method.spare_mut) to the content.

	Panics if there's less than `n` bytes of spare room.
	*/
	pub fn incr_len(&mut self, n: usize) {
		assert!(n <= self.free, "attempted to append {} bytes with only {} available", n, self.free);
		self.len += n;
		self.free -= n;
		self.terminate();
	}

	/**
	Cut string at its first zero byte, if any.

	Handy after writing a C-style string with [`as_bytes_mut()`](#method.as_bytes_mut).
	*/
	pub fn update_len(&mut self) {
		let n = memchr(0, self.as_bytes()).unwrap_or(self.len);
		self.free += self.len - n;
		self.len = n;
	}

	/**
	Keep only bytes `start..=end` of the string, in place.

	Negative indices count from the end (`-1` is the last byte).
	Indices are clamped to the content; string becomes empty if the range is.
	*/
	pub fn range(&mut self, start: isize, end: isize) {
		if self.len == 0 {
			return;
		}
		let len = self.len as isize;
		let start = if start < 0 { std::cmp::max(len + start, 0) } else { start };
		let end = if end < 0 { std::cmp::max(len + end, 0) } else { end };
		let end = std::cmp::min(end, len - 1);

		let (start, newlen) = if start >= len || start > end {
			(0, 0)
		} else {
			(start as usize, (end - start + 1) as usize)
		};
		if start != 0 && newlen != 0 {
			copy_in_place(self.block_mut(), start .. (start+newlen), 0);
		}
		self.free += self.len - newlen;
		self.len = newlen;
		self.terminate();
	}

	/// Strip bytes found in `cset` from both ends of the string, in place
	pub fn trim(&mut self, cset: &[u8]) {
		let keep = |c: &u8| !cset.contains(c);
		let content = self.as_bytes();
		let start = content.iter().position(keep).unwrap_or(content.len());
		let end = content.iter().rposition(keep).map_or(start, |n| n + 1);

		let newlen = end - start;
		if start != 0 && newlen != 0 {
			copy_in_place(self.block_mut(), start..end, 0);
		}
		self.free += self.len - newlen;
		self.len = newlen;
		self.terminate();
	}

	/// Shrink block underneath so that there's no spare room left
	pub fn remove_free_space(&mut self) -> Result<()> {
		if self.free == 0 {
			return Ok(());
		}
		let size = self.len + 1;
		if let Err(e) = self.alloc.reallocate(&mut *self.buf, size) {
			debug!(size, error = %e, "failed to shrink string");
			return Err(e);
		}
		self.free = 0;
		Ok(())
	}

	pub fn make_ascii_lowercase(&mut self) {
		self.as_bytes_mut().make_ascii_lowercase()
	}
	pub fn make_ascii_uppercase(&mut self) {
		self.as_bytes_mut().make_ascii_uppercase()
	}
}

/// Release `s`, if there's anything to release
pub fn destroy<A: Allocator>(s: Option<Sds<A>>) {
	drop(s)
}

impl<A: Allocator> Drop for Sds<A> {
	fn drop(&mut self) {
		// `buf` is never touched again after this
		let buf = unsafe { ManuallyDrop::take(&mut self.buf) };
		self.alloc.release(buf);
	}
}

impl<A: Allocator> AsRef<[u8]> for Sds<A> {
	fn as_ref(&self) -> &[u8] {
		self.as_bytes()
	}
}

impl<A: Allocator, B: Allocator> PartialEq<Sds<B>> for Sds<A> {
	fn eq(&self, other: &Sds<B>) -> bool {
		self.as_bytes() == other.as_bytes()
	}
}
impl<A: Allocator> Eq for Sds<A> {}
impl<A: Allocator> PartialEq<[u8]> for Sds<A> {
	fn eq(&self, other: &[u8]) -> bool {
		self.as_bytes() == other
	}
}

// byte by byte, and shorter string goes first if the other one starts with it
impl<A: Allocator> PartialOrd for Sds<A> {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}
impl<A: Allocator> Ord for Sds<A> {
	fn cmp(&self, other: &Self) -> Ordering {
		self.as_bytes().cmp(other.as_bytes())
	}
}

struct Escaped<'a>(&'a [u8]);
impl fmt::Debug for Escaped<'_> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str("\"")?;
		for &c in self.0 {
			for e in std::ascii::escape_default(c) {
				write!(f, "{}", e as char)?;
			}
		}
		f.write_str("\"")
	}
}

impl<A: Allocator> fmt::Debug for Sds<A> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("Sds")
			.field("len", &self.len)
			.field("free", &self.free)
			.field("data", &Escaped(self.as_bytes()))
			.finish()
	}
}

impl<A: Allocator> io::Write for Sds<A> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.append(buf)?;
		Ok(buf.len())
	}
	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}
