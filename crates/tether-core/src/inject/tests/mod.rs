pub mod methods_tests;
