//! Simple math operations on `uint256` storage values.
mod checked;
mod unchecked;

pub(crate) use checked::AddAssignChecked;
pub(crate) use unchecked::{AddAssignUnchecked, SubAssignUnchecked};
