//! Account queries.

use super::{Account, NewAccount, Store, StoreError};

const ACCOUNT_COLUMNS: &str = "account_id, account_firstname, account_lastname, account_email, account_password, account_type";

impl Store {
    pub async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let sql = format!("SELECT {} FROM account WHERE account_email = ?", ACCOUNT_COLUMNS);
        self.bounded(
            sqlx::query_as::<_, Account>(&sql)
                .bind(email)
                .fetch_optional(&self.pool),
        )
        .await
    }

    pub async fn find_account_by_id(&self, account_id: i64) -> Result<Option<Account>, StoreError> {
        let sql = format!("SELECT {} FROM account WHERE account_id = ?", ACCOUNT_COLUMNS);
        self.bounded(
            sqlx::query_as::<_, Account>(&sql)
                .bind(account_id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    /// Id of the account registered under `email`, if any.
    pub async fn email_owner(&self, email: &str) -> Result<Option<i64>, StoreError> {
        self.bounded(
            sqlx::query_scalar::<_, i64>("SELECT account_id FROM account WHERE account_email = ?")
                .bind(email)
                .fetch_optional(&self.pool),
        )
        .await
    }

    /// Insert an account and return its generated id. A duplicate email
    /// surfaces as `StoreError::Conflict`.
    pub async fn insert_account(&self, account: &NewAccount) -> Result<i64, StoreError> {
        let result = self
            .bounded(
                sqlx::query(
                    r#"
                    INSERT INTO account (account_firstname, account_lastname, account_email, account_password, account_type)
                    VALUES (?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&account.first_name)
                .bind(&account.last_name)
                .bind(&account.email)
                .bind(&account.password_hash)
                .bind(account.account_type.as_str())
                .execute(&self.pool),
            )
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Update names and email. Returns false when no such account exists.
    pub async fn update_account(
        &self,
        account_id: i64,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<bool, StoreError> {
        let result = self
            .bounded(
                sqlx::query(
                    r#"
                    UPDATE account
                    SET account_firstname = ?, account_lastname = ?, account_email = ?
                    WHERE account_id = ?
                    "#,
                )
                .bind(first_name)
                .bind(last_name)
                .bind(email)
                .bind(account_id)
                .execute(&self.pool),
            )
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn update_password(&self, account_id: i64, password_hash: &str) -> Result<bool, StoreError> {
        let result = self
            .bounded(
                sqlx::query("UPDATE account SET account_password = ? WHERE account_id = ?")
                    .bind(password_hash)
                    .bind(account_id)
                    .execute(&self.pool),
            )
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
