pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod documents;
pub mod invoices;
pub mod phases;
pub mod projects;
pub mod tasks;
pub mod todos;
pub mod webhooks;
