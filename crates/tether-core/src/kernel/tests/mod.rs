pub mod logger_tests;
