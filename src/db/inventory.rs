//! Classification and inventory queries.

use super::{Classification, InventoryItem, Store, StoreError, VehicleData};

const ITEM_SELECT: &str = r#"
    SELECT i.inv_id, i.inv_make, i.inv_model, i.inv_year, i.inv_description,
           i.inv_image, i.inv_thumbnail, i.inv_price, i.inv_miles, i.inv_color,
           i.classification_id, c.classification_name
    FROM inventory AS i
    JOIN classification AS c ON i.classification_id = c.classification_id
"#;

impl Store {
    pub async fn list_classifications(&self) -> Result<Vec<Classification>, StoreError> {
        self.bounded(
            sqlx::query_as::<_, Classification>(
                "SELECT classification_id, classification_name FROM classification ORDER BY classification_name",
            )
            .fetch_all(&self.pool),
        )
        .await
    }

    pub async fn find_classification(&self, classification_id: i64) -> Result<Option<Classification>, StoreError> {
        self.bounded(
            sqlx::query_as::<_, Classification>(
                "SELECT classification_id, classification_name FROM classification WHERE classification_id = ?",
            )
            .bind(classification_id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    /// Case-insensitive existence check on the classification name.
    pub async fn classification_name_exists(&self, name: &str) -> Result<bool, StoreError> {
        let count = self
            .bounded(
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM classification WHERE lower(classification_name) = lower(?)",
                )
                .bind(name)
                .fetch_one(&self.pool),
            )
            .await?;
        Ok(count > 0)
    }

    pub async fn insert_classification(&self, name: &str) -> Result<Classification, StoreError> {
        let result = self
            .bounded(
                sqlx::query("INSERT INTO classification (classification_name) VALUES (?)")
                    .bind(name)
                    .execute(&self.pool),
            )
            .await?;
        Ok(Classification {
            classification_id: result.last_insert_rowid(),
            classification_name: name.to_string(),
        })
    }

    /// Number of vehicles filed under a classification.
    pub async fn count_vehicles_in(&self, classification_id: i64) -> Result<i64, StoreError> {
        self.bounded(
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM inventory WHERE classification_id = ?")
                .bind(classification_id)
                .fetch_one(&self.pool),
        )
        .await
    }

    /// Delete a classification. The foreign key refuses the delete while
    /// vehicles still reference it (`StoreError::Referenced`).
    pub async fn delete_classification(&self, classification_id: i64) -> Result<bool, StoreError> {
        let result = self
            .bounded(
                sqlx::query("DELETE FROM classification WHERE classification_id = ?")
                    .bind(classification_id)
                    .execute(&self.pool),
            )
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn inventory_by_classification(&self, classification_id: i64) -> Result<Vec<InventoryItem>, StoreError> {
        let sql = format!("{} WHERE i.classification_id = ? ORDER BY i.inv_make, i.inv_model", ITEM_SELECT);
        self.bounded(
            sqlx::query_as::<_, InventoryItem>(&sql)
                .bind(classification_id)
                .fetch_all(&self.pool),
        )
        .await
    }

    pub async fn find_vehicle(&self, inv_id: i64) -> Result<Option<InventoryItem>, StoreError> {
        let sql = format!("{} WHERE i.inv_id = ?", ITEM_SELECT);
        self.bounded(
            sqlx::query_as::<_, InventoryItem>(&sql)
                .bind(inv_id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    /// Most recently added vehicles, newest first.
    pub async fn latest_vehicles(&self, limit: i64) -> Result<Vec<InventoryItem>, StoreError> {
        let sql = format!("{} ORDER BY i.inv_id DESC LIMIT ?", ITEM_SELECT);
        self.bounded(
            sqlx::query_as::<_, InventoryItem>(&sql)
                .bind(limit)
                .fetch_all(&self.pool),
        )
        .await
    }

    pub async fn insert_vehicle(&self, vehicle: &VehicleData) -> Result<i64, StoreError> {
        let result = self
            .bounded(
                sqlx::query(
                    r#"
                    INSERT INTO inventory
                        (classification_id, inv_make, inv_model, inv_year, inv_description,
                         inv_image, inv_thumbnail, inv_price, inv_miles, inv_color)
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(vehicle.classification_id)
                .bind(&vehicle.make)
                .bind(&vehicle.model)
                .bind(vehicle.year)
                .bind(&vehicle.description)
                .bind(&vehicle.image)
                .bind(&vehicle.thumbnail)
                .bind(vehicle.price)
                .bind(vehicle.miles)
                .bind(&vehicle.color)
                .execute(&self.pool),
            )
            .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn update_vehicle(&self, inv_id: i64, vehicle: &VehicleData) -> Result<bool, StoreError> {
        let result = self
            .bounded(
                sqlx::query(
                    r#"
                    UPDATE inventory SET
                        inv_make = ?, inv_model = ?, inv_description = ?, inv_image = ?,
                        inv_thumbnail = ?, inv_price = ?, inv_year = ?, inv_miles = ?,
                        inv_color = ?, classification_id = ?
                    WHERE inv_id = ?
                    "#,
                )
                .bind(&vehicle.make)
                .bind(&vehicle.model)
                .bind(&vehicle.description)
                .bind(&vehicle.image)
                .bind(&vehicle.thumbnail)
                .bind(vehicle.price)
                .bind(vehicle.year)
                .bind(vehicle.miles)
                .bind(&vehicle.color)
                .bind(vehicle.classification_id)
                .bind(inv_id)
                .execute(&self.pool),
            )
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_vehicle(&self, inv_id: i64) -> Result<bool, StoreError> {
        let result = self
            .bounded(
                sqlx::query("DELETE FROM inventory WHERE inv_id = ?")
                    .bind(inv_id)
                    .execute(&self.pool),
            )
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
pub(crate) fn sample_vehicle(classification_id: i64) -> VehicleData {
    VehicleData {
        classification_id,
        make: "Chevy".to_string(),
        model: "Camaro".to_string(),
        year: 2018,
        description: "If you want to look cool this is the car you need!".to_string(),
        image: "/images/vehicles/camaro.jpg".to_string(),
        thumbnail: "/images/vehicles/camaro-tn.jpg".to_string(),
        price: 25000.0,
        miles: 101222,
        color: "Black".to_string(),
    }
}
