pub mod prototype_tests;
