//! User business logic service.
//!
//! Handles the operations an authenticated account performs on itself and
//! the administrator listing. Every operation is keyed by the id carried in
//! the caller's token claims.

use crate::api::user::models::{HealthPlanRequest, UpdateDetailsRequest};
use crate::database::models::{AccountProfile, AccountUpdate};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::account_repository::AccountDirectory;
use crate::utils::jwt::Claims;
use crate::utils::validation::validate_request;

pub struct UserService<'a> {
    /// Shared account directory
    accounts: &'a dyn AccountDirectory,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    ///
    /// # Arguments
    /// * `accounts` - Account directory the operations run against
    pub fn new(accounts: &'a dyn AccountDirectory) -> Self {
        Self { accounts }
    }

    /// Stores the caller's BVN and phone number.
    ///
    /// # Errors
    /// Returns `ServiceError` for:
    /// - A missing BVN or phone number
    /// - Badly shaped values
    /// - An account that no longer exists
    pub async fn update_details(
        &self,
        claims: &Claims,
        request: UpdateDetailsRequest,
    ) -> ServiceResult<()> {
        validate_request(&request)?;

        let (Some(bvn), Some(phone_number)) = (&request.bvn, &request.phone_number) else {
            return Err(ServiceError::validation(
                "Both BVN and phone number are required",
            ));
        };

        let update = AccountUpdate {
            bvn: Some(parse_number(bvn, "BVN")?),
            phone_number: Some(parse_number(phone_number, "phone number")?),
            health_plan: None,
        };

        self.apply(claims, update).await?;
        tracing::info!("Updated details for account {}", claims.sub);
        Ok(())
    }

    /// Records the caller's chosen health plan.
    pub async fn choose_health_plan(
        &self,
        claims: &Claims,
        request: HealthPlanRequest,
    ) -> ServiceResult<()> {
        let request = HealthPlanRequest {
            health_plan: request.health_plan.trim().to_string(),
        };
        validate_request(&request)?;

        let update = AccountUpdate {
            health_plan: Some(request.health_plan),
            ..AccountUpdate::default()
        };

        self.apply(claims, update).await?;
        tracing::info!("Account {} chose a health plan", claims.sub);
        Ok(())
    }

    /// Permanently removes the caller's account.
    pub async fn delete_account(&self, claims: &Claims) -> ServiceResult<()> {
        if self.accounts.delete(claims.user_id()).await? == 0 {
            return Err(ServiceError::not_found("User not found"));
        }

        tracing::info!("Deleted account {}", claims.sub);
        Ok(())
    }

    /// Returns every account without credentials or identity numbers.
    pub async fn list_accounts(&self) -> ServiceResult<Vec<AccountProfile>> {
        let accounts = self.accounts.list_all().await?;
        Ok(accounts.iter().map(AccountProfile::from).collect())
    }

    async fn apply(&self, claims: &Claims, update: AccountUpdate) -> ServiceResult<()> {
        if self.accounts.update_fields(claims.user_id(), update).await? == 0 {
            return Err(ServiceError::not_found("User not found"));
        }
        Ok(())
    }
}

fn parse_number(value: &str, field: &str) -> ServiceResult<i64> {
    value
        .parse::<i64>()
        .map_err(|_| ServiceError::validation(format!("Invalid {}", field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::database::models::{CreateAccount, Role};
    use crate::repositories::account_repository::AccountRepository;
    use crate::utils::jwt::TokenKind;

    async fn directory() -> AccountRepository {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        AccountRepository::new(db.pool().clone())
    }

    async fn claims_for(repo: &AccountRepository, email: &str) -> Claims {
        let account = repo
            .create(CreateAccount {
                email: email.to_string(),
                first_name: "test".to_string(),
                last_name: "user".to_string(),
                password_hash: "$2b$10$notarealhash".to_string(),
                verified: true,
                role: Role::User,
            })
            .await
            .unwrap();

        Claims {
            sub: account.id,
            email: account.email,
            role: account.role,
            kind: TokenKind::Session,
            iat: 0,
            nbf: 0,
            exp: i64::MAX,
        }
    }

    fn details(bvn: Option<&str>, phone: Option<&str>) -> UpdateDetailsRequest {
        UpdateDetailsRequest {
            bvn: bvn.map(str::to_string),
            phone_number: phone.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_update_details_stores_numbers() {
        let repo = directory().await;
        let claims = claims_for(&repo, "a@b.com").await;
        let service = UserService::new(&repo);

        service
            .update_details(&claims, details(Some("12345678901"), Some("+2347034568886")))
            .await
            .unwrap();

        let account = repo.find_by_id(&claims.sub).await.unwrap().unwrap();
        assert_eq!(account.bvn, Some(12345678901));
        assert_eq!(account.phone_number, Some(2347034568886));
    }

    #[tokio::test]
    async fn test_update_details_requires_both_fields() {
        let repo = directory().await;
        let claims = claims_for(&repo, "a@b.com").await;
        let service = UserService::new(&repo);

        let err = service
            .update_details(&claims, details(Some("12345678901"), None))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Both BVN and phone number are required");
    }

    #[tokio::test]
    async fn test_health_plan_is_trimmed() {
        let repo = directory().await;
        let claims = claims_for(&repo, "a@b.com").await;
        let service = UserService::new(&repo);

        service
            .choose_health_plan(
                &claims,
                HealthPlanRequest {
                    health_plan: "  Gold ".to_string(),
                },
            )
            .await
            .unwrap();

        let account = repo.find_by_id(&claims.sub).await.unwrap().unwrap();
        assert_eq!(account.health_plan.as_deref(), Some("Gold"));
    }

    #[tokio::test]
    async fn test_operations_on_deleted_account_are_not_found() {
        let repo = directory().await;
        let claims = claims_for(&repo, "a@b.com").await;
        let service = UserService::new(&repo);

        service.delete_account(&claims).await.unwrap();

        let err = service.delete_account(&claims).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));

        let err = service
            .update_details(&claims, details(Some("12345678901"), Some("2347034568886")))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_accounts() {
        let repo = directory().await;
        claims_for(&repo, "a@b.com").await;
        claims_for(&repo, "c@d.com").await;

        let profiles = UserService::new(&repo).list_accounts().await.unwrap();
        assert_eq!(profiles.len(), 2);
    }
}
