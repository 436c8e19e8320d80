pub mod audit_service;
pub mod inventory_service;
pub mod ledger_service;
pub mod registry_service;
pub mod report_service;
