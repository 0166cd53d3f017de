pub mod support;

mod membership_tests;
