use super::KeyValueStore;
use crate::error::AppError;
use crate::model::TaskCollection;

pub fn load_collection(store: &dyn KeyValueStore, key: &str) -> Result<TaskCollection, AppError> {
    let Some(content) = store.get(key)? else {
        return Ok(TaskCollection::default());
    };

    let collection: TaskCollection =
        serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))?;

    if let Some(id) = TaskCollection::duplicate_id(&collection.tasks) {
        return Err(AppError::invalid_data(format!(
            "task id {id} is stored more than once"
        )));
    }

    Ok(collection)
}

pub fn save_collection(
    store: &dyn KeyValueStore,
    key: &str,
    collection: &TaskCollection,
) -> Result<(), AppError> {
    let content =
        serde_json::to_string(collection).map_err(|err| AppError::invalid_data(err.to_string()))?;
    store.put(key, &content)
}
