//! Scenario tests for the session store.
//!
//! These drive the public `DB` facade end to end: client calls on one side,
//! the background sweeper on the other.


pub mod support;
