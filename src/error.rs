use quick_error::quick_error;

quick_error! {
	/// Error emitted when a string could not be created or grown
	#[derive(Debug, Clone, PartialEq, Eq)]
	pub enum Error {
		/// Allocator failed to hand out (or resize to) `size` bytes
		Alloc(size: usize) {
			display("failed to allocate {} bytes", size)
		}
		/// Requested length does not fit into `usize`
		Overflow {
			display("requested string length overflows usize")
		}
	}
}

pub type Result<T> = std::result::Result<T, Error>;

// io::Write impl for Sds needs this
impl From<Error> for std::io::Error {
	fn from(err: Error) -> Self {
		std::io::Error::new(std::io::ErrorKind::Other, err)
	}
}
