//! PostgreSQL-backed `AccountRepository` implementation using Diesel.
//!
//! The two roles map to two structurally identical tables. Diesel's table
//! types are distinct, so each operation matches on the role and runs the
//! same query shape against the selected table.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;

use crate::domain::account::{AccountId, NewAccount, Phone, Role, StoredAccount};
use crate::domain::ports::{AccountPersistenceError, AccountRepository};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::pool::{DbPool, PoolError};
use super::schema::{customer_accounts, farmer_accounts};

/// Diesel-backed implementation of the account repository port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_account_pool_error(error: PoolError) -> AccountPersistenceError {
    map_pool_error(error, AccountPersistenceError::connection)
}

/// The unique phone index surfaces as a duplicate-account error; everything
/// else follows the shared mapping.
fn map_account_diesel_error(error: DieselError) -> AccountPersistenceError {
    if matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    ) {
        return AccountPersistenceError::duplicate();
    }
    map_diesel_error(
        error,
        AccountPersistenceError::query,
        AccountPersistenceError::connection,
    )
}

fn row_to_stored(row: (i32, String, String, String)) -> StoredAccount {
    let (id, username, phone, password_hash) = row;
    StoredAccount {
        id: AccountId::new(id),
        username,
        phone,
        password_hash,
    }
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn insert(
        &self,
        role: Role,
        account: &NewAccount,
    ) -> Result<AccountId, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_account_pool_error)?;

        let id = match role {
            Role::Farmer => {
                diesel::insert_into(farmer_accounts::table)
                    .values((
                        farmer_accounts::username.eq(account.username.as_str()),
                        farmer_accounts::phone.eq(account.phone.as_str()),
                        farmer_accounts::password_hash.eq(account.password_hash.as_str()),
                    ))
                    .returning(farmer_accounts::id)
                    .get_result::<i32>(&mut conn)
                    .await
            }
            Role::Customer => {
                diesel::insert_into(customer_accounts::table)
                    .values((
                        customer_accounts::username.eq(account.username.as_str()),
                        customer_accounts::phone.eq(account.phone.as_str()),
                        customer_accounts::password_hash.eq(account.password_hash.as_str()),
                    ))
                    .returning(customer_accounts::id)
                    .get_result::<i32>(&mut conn)
                    .await
            }
        }
        .map_err(map_account_diesel_error)?;

        Ok(AccountId::new(id))
    }

    async fn find_by_phone(
        &self,
        role: Role,
        phone: &Phone,
    ) -> Result<Option<StoredAccount>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_account_pool_error)?;

        let row = match role {
            Role::Farmer => {
                farmer_accounts::table
                    .filter(farmer_accounts::phone.eq(phone.as_str()))
                    .select((
                        farmer_accounts::id,
                        farmer_accounts::username,
                        farmer_accounts::phone,
                        farmer_accounts::password_hash,
                    ))
                    .first::<(i32, String, String, String)>(&mut conn)
                    .await
            }
            Role::Customer => {
                customer_accounts::table
                    .filter(customer_accounts::phone.eq(phone.as_str()))
                    .select((
                        customer_accounts::id,
                        customer_accounts::username,
                        customer_accounts::phone,
                        customer_accounts::password_hash,
                    ))
                    .first::<(i32, String, String, String)>(&mut conn)
                    .await
            }
        };

        match row {
            Ok(row) => Ok(Some(row_to_stored(row))),
            Err(DieselError::NotFound) => Ok(None),
            Err(err) => Err(map_account_diesel_error(err)),
        }
    }
}
