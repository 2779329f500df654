use crate::Error;

/// Writes primitive (integer) to `output` (which implements `std::io::Write`);
/// in little-endian bytes order.
macro_rules! write_int {
    ($output:expr, $what:expr) => {
     ::std::io::Write::write_all($output, &$what.to_le_bytes())
    }
}

/// Reads primitive (integer) from `input` (which implements `std::io::Read`);
/// in little-endian bytes order, returning `std::io::Result`.
macro_rules! read_int {
    ($input:expr, $what:ty) => {{
        let mut buff = [0u8; ::std::mem::size_of::<$what>()];
        let result = ::std::io::Read::read_exact($input, &mut buff);
        result.map(|()| <$what>::from_le_bytes(buff))
    }}
}

pub(crate) use {read_int, write_int};

/// Converts `error` met while reading the key `field`.
/// A premature end of input means a truncated key, other errors are passed through.
pub(crate) fn key_read_error(error: std::io::Error, field: &str) -> Error {
    if error.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::CorruptKey(format!("key is truncated, missing {}", field))
    } else {
        Error::Io(error)
    }
}
