//! The `PortalStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `talenta-store-sqlite`).
//! Higher layers (`talenta-sheets`, `talenta-api`) depend on this abstraction,
//! not on any concrete backend.
//!
//! Listing methods take a [`Scope`]; single-row getters return `None` when the
//! row does not exist and leave scope checks to the caller, which needs the
//! row's company to decide between "not found" and "forbidden".

use std::future::Future;

use crate::{
  application::{
    Application, ApplicationDetail, ApplicationStatus, CompletedApplication,
    CompletedApplicationDetail, MobilityCandidate, NewApplication,
  },
  batch::{BatchEmployee, UpsertReport},
  company::{Company, NewCompany},
  employee::{Employee, EducationListing, EmployeeProfile, EmployeeRecord, EmployeeSummary},
  id::{ApplicationId, CompanyId, CompletedApplicationId, EmployeeId, JobId, UserId},
  job::{Job, JobListing, NewJob},
  scope::Scope,
  user::{NewUser, User, UserCredentials},
};

/// Abstraction over a portal store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PortalStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Companies ─────────────────────────────────────────────────────────

  fn add_company(
    &self,
    input: NewCompany,
  ) -> impl Future<Output = Result<Company, Self::Error>> + Send + '_;

  fn get_company(
    &self,
    id: CompanyId,
  ) -> impl Future<Output = Result<Option<Company>, Self::Error>> + Send + '_;

  /// All companies ordered by id.
  fn list_companies(
    &self,
  ) -> impl Future<Output = Result<Vec<Company>, Self::Error>> + Send + '_;

  // ── Employees ─────────────────────────────────────────────────────────

  fn list_employees(
    &self,
    scope: Scope,
  ) -> impl Future<Output = Result<Vec<EmployeeSummary>, Self::Error>> + Send + '_;

  fn get_employee(
    &self,
    id: EmployeeId,
  ) -> impl Future<Output = Result<Option<EmployeeProfile>, Self::Error>> + Send + '_;

  /// Insert an employee together with all four child collections.
  fn add_employee(
    &self,
    record: EmployeeRecord,
  ) -> impl Future<Output = Result<Employee, Self::Error>> + Send + '_;

  /// Overwrite the core fields and replace every child collection wholesale.
  fn update_employee(
    &self,
    id: EmployeeId,
    record: EmployeeRecord,
  ) -> impl Future<Output = Result<Employee, Self::Error>> + Send + '_;

  /// Delete an employee with its child rows, applications and completed
  /// applications in one transaction.
  fn delete_employee(
    &self,
    id: EmployeeId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Resolve and persist every employee of a batch inside one transaction,
  /// in batch order. Any failure rolls the whole batch back.
  fn upsert_employees(
    &self,
    batch: Vec<BatchEmployee>,
  ) -> impl Future<Output = Result<UpsertReport, Self::Error>> + Send + '_;

  /// Employees of `company` flagged for talent mobility or holding at least
  /// one live application, with those applications.
  fn list_mobility_candidates(
    &self,
    company: CompanyId,
  ) -> impl Future<Output = Result<Vec<MobilityCandidate>, Self::Error>> + Send + '_;

  /// Every education row in the store, for the database dump.
  fn list_education(
    &self,
  ) -> impl Future<Output = Result<Vec<EducationListing>, Self::Error>> + Send + '_;

  // ── Jobs ──────────────────────────────────────────────────────────────

  fn list_jobs(
    &self,
    scope: Scope,
  ) -> impl Future<Output = Result<Vec<JobListing>, Self::Error>> + Send + '_;

  fn get_job(
    &self,
    id: JobId,
  ) -> impl Future<Output = Result<Option<JobListing>, Self::Error>> + Send + '_;

  fn add_job(
    &self,
    input: NewJob,
  ) -> impl Future<Output = Result<Job, Self::Error>> + Send + '_;

  fn update_job(
    &self,
    id: JobId,
    input: NewJob,
  ) -> impl Future<Output = Result<Job, Self::Error>> + Send + '_;

  /// Refuses to delete a job still referenced by any application.
  fn delete_job(
    &self,
    id: JobId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Applications ──────────────────────────────────────────────────────

  /// Live applications whose job belongs to a company the scope admits.
  fn list_applications(
    &self,
    scope: Scope,
  ) -> impl Future<Output = Result<Vec<ApplicationDetail>, Self::Error>> + Send + '_;

  /// Live applications submitted by employees of `company`.
  fn list_outgoing_applications(
    &self,
    company: CompanyId,
  ) -> impl Future<Output = Result<Vec<ApplicationDetail>, Self::Error>> + Send + '_;

  fn get_application(
    &self,
    id: ApplicationId,
  ) -> impl Future<Output = Result<Option<ApplicationDetail>, Self::Error>> + Send + '_;

  /// Record a new application and flag the employee for talent mobility.
  fn add_application(
    &self,
    input: NewApplication,
  ) -> impl Future<Output = Result<Application, Self::Error>> + Send + '_;

  fn update_application_status(
    &self,
    id: ApplicationId,
    status: ApplicationStatus,
  ) -> impl Future<Output = Result<Application, Self::Error>> + Send + '_;

  fn delete_application(
    &self,
    id: ApplicationId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Move a live application into the completed table. The current status
  /// is not checked.
  fn complete_application(
    &self,
    id: ApplicationId,
  ) -> impl Future<Output = Result<CompletedApplication, Self::Error>> + Send + '_;

  // ── Completed applications ────────────────────────────────────────────

  /// Completed applications whose employee's or job's company the scope
  /// admits.
  fn list_completed_applications(
    &self,
    scope: Scope,
  ) -> impl Future<Output = Result<Vec<CompletedApplicationDetail>, Self::Error>> + Send + '_;

  fn get_completed_application(
    &self,
    id: CompletedApplicationId,
  ) -> impl Future<Output = Result<Option<CompletedApplicationDetail>, Self::Error>>
  + Send
  + '_;

  fn delete_completed_application(
    &self,
    id: CompletedApplicationId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Users ─────────────────────────────────────────────────────────────

  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  fn find_user_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<UserCredentials>, Self::Error>> + Send + '_;

  fn set_password_hash(
    &self,
    id: UserId,
    password_hash: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Append a login audit row.
  fn record_login(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
