use std::cell::{Cell, RefCell};
use fnv::FnvHashMap;
use crate::Error;

/**
Wrapper that keeps track of calls made to the allocator underneath,
and can be told to fail every call starting from some point

Release is not counted as a call that may fail.
*/
pub(crate) struct Probe<A> {
	inner: A,
	calls: RefCell<FnvHashMap<&'static str, usize>>,
	// total number of calls that might allocate
	total: Cell<usize>,
	fail_from: Cell<Option<usize>>,
}

impl<A: super::Allocator> Probe<A> {
	pub(crate) fn new(inner: A) -> Self {
		Probe {
			inner,
			calls: RefCell::new(FnvHashMap::default()),
			total: Cell::new(0),
			fail_from: Cell::new(None),
		}
	}
	/// Make `n`th allocating call (counting from 1, including ones made so far) and all subsequent ones fail
	pub(crate) fn fail_from(&self, n: usize) {
		self.fail_from.set(Some(n));
	}
	pub(crate) fn heal(&self) {
		self.fail_from.set(None);
	}
	pub(crate) fn calls(&self, op: &str) -> usize {
		self.calls.borrow().get(op).cloned().unwrap_or(0)
	}
	/// Number of allocate/allocate_zeroed/reallocate calls so far
	pub(crate) fn total(&self) -> usize {
		self.total.get()
	}

	fn record(&self, op: &'static str, size: usize) -> Result<(), Error> {
		*self.calls.borrow_mut().entry(op).or_insert(0) += 1;
		if op == "release" {
			return Ok(());
		}
		let n = self.total.get() + 1;
		self.total.set(n);
		match self.fail_from.get() {
			Some(from) if n >= from => Err(Error::Alloc(size)),
			_ => Ok(()),
		}
	}
}

impl<A: super::Allocator> super::Allocator for Probe<A> {
	type Block = A::Block;
	fn allocate(&self, size: usize) -> Result<Self::Block, Error> {
		self.record("allocate", size)?;
		self.inner.allocate(size)
	}
	fn allocate_zeroed(&self, size: usize) -> Result<Self::Block, Error> {
		self.record("allocate_zeroed", size)?;
		self.inner.allocate_zeroed(size)
	}
	fn reallocate(&self, block: &mut Self::Block, size: usize) -> Result<(), Error> {
		self.record("reallocate", size)?;
		self.inner.reallocate(block, size)
	}
	fn release(&self, block: Self::Block) {
		let _ = self.record("release", 0);
		self.inner.release(block)
	}
}
