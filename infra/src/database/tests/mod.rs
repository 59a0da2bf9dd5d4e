mod verification_code_repository_tests;
