mod google_sheets_mock;
mod smoke_tests;

// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - smoke_tests: Basic functionality tests to ensure nothing is broken
// - google_sheets_mock: Mocking the Google Sheets API for testing
// - webhook_tests: Driving the webhook endpoint against the mocked backend
