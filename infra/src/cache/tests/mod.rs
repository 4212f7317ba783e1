mod redis_client_tests;
mod revocation_cache_tests;
