mod dispatcher_tests;
mod log_transport_tests;
mod worker_tests;
