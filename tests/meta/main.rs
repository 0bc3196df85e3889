//! Repository layout checks for the unit test mirror
