use crate::config::global_options;
use crate::error::Result;
use crate::macros::err;

/// Checks a size taken from the input against `GlobalOptions::allocation_limit`
pub(crate) fn check_allocation(expected_size: usize) -> Result<()> {
	if expected_size > global_options().allocation_limit {
		err!(TooMuchData);
	}

	Ok(())
}

/// **DO NOT USE DIRECTLY**
///
/// Creates a `Vec` of the specified length, containing copies of `element`.
///
/// This should be used through [`try_vec!`](crate::macros::try_vec)
pub(crate) fn fallible_vec_from_element<T>(element: T, expected_size: usize) -> Result<Vec<T>>
where
	T: Clone,
{
	let mut v = Vec::new();
	if expected_size == 0 {
		return Ok(v);
	}

	check_allocation(expected_size)?;

	v.try_reserve_exact(expected_size)?;
	v.resize(expected_size, element);

	Ok(v)
}

/// Provides the `try_with_capacity` method on `Vec`
///
/// This can be used directly.
pub(crate) trait VecFallibleCapacity<T>: Sized {
	/// Same as `Vec::with_capacity`, but takes `GlobalOptions::allocation_limit` into account.
	///
	/// Named `try_with_capacity_stable` to avoid conflicts with the nightly `Vec::try_with_capacity`.
	fn try_with_capacity_stable(capacity: usize) -> Result<Self>;
}

impl<T> VecFallibleCapacity<T> for Vec<T> {
	fn try_with_capacity_stable(capacity: usize) -> Result<Self> {
		check_allocation(capacity)?;

		let mut v = Vec::new();
		v.try_reserve(capacity)?;

		Ok(v)
	}
}
