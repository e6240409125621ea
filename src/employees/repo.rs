use anyhow::Context;
use sqlx::PgPool;

use super::repo_types::{Employee, EmployeeRow};

const EMPLOYEE_COLUMNS: &str = "id, name, last_name, agency, date_of_birth, high_date, status, \
                                low_date, photo, id_user, last_modified, modified_by";

impl Employee {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Employee>> {
        let rows = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY id"
        ))
        .fetch_all(db)
        .await
        .context("list employees")?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<Employee>> {
        let row = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find employee by id")?;
        Ok(row)
    }

    pub async fn create(db: &PgPool, row: &EmployeeRow) -> anyhow::Result<Employee> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            r#"
            INSERT INTO employees
                (name, last_name, agency, date_of_birth, high_date, status,
                 low_date, photo, id_user, modified_by, last_modified)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now())
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(&row.name)
        .bind(&row.last_name)
        .bind(&row.agency)
        .bind(row.date_of_birth)
        .bind(row.high_date)
        .bind(&row.status)
        .bind(row.low_date)
        .bind(row.photo.as_deref())
        .bind(row.id_user)
        .bind(row.modified_by)
        .fetch_one(db)
        .await
        .context("insert employee")?;
        Ok(employee)
    }

    /// Returns `None` when no row has this id.
    pub async fn update(
        db: &PgPool,
        id: i64,
        row: &EmployeeRow,
    ) -> anyhow::Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            r#"
            UPDATE employees
               SET name = $2,
                   last_name = $3,
                   agency = $4,
                   date_of_birth = $5,
                   high_date = $6,
                   status = $7,
                   low_date = $8,
                   photo = $9,
                   id_user = $10,
                   modified_by = $11,
                   last_modified = now()
             WHERE id = $1
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&row.name)
        .bind(&row.last_name)
        .bind(&row.agency)
        .bind(row.date_of_birth)
        .bind(row.high_date)
        .bind(&row.status)
        .bind(row.low_date)
        .bind(row.photo.as_deref())
        .bind(row.id_user)
        .bind(row.modified_by)
        .fetch_optional(db)
        .await
        .context("update employee")?;
        Ok(employee)
    }

    /// Returns whether a row was deleted.
    pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("delete employee")?;
        Ok(res.rows_affected() > 0)
    }
}
