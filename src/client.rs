//! This module provides a client to connect to the task server

use async_trait::async_trait;
use reqwest::Response;
use serde::Deserialize;
use url::Url;

use crate::error::ViewError;
use crate::task::{Task, TaskDraft, TaskIndex};
use crate::traits::TaskBackend;


/// Body of `GET /tasks`
#[derive(Deserialize)]
struct TaskList {
    tasks: Option<Vec<Task>>,
}

/// Body of `POST /add_task` and `POST /update_task/{index}`
#[derive(Deserialize)]
struct TaskReply {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    task_index: Option<usize>,
    task: Task,
}


/// A [`TaskBackend`] that talks to the task server over HTTP
pub struct Client {
    url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>>(url: S) -> Result<Self, url::ParseError> {
        let url = Url::parse(url.as_ref())?;

        Ok(Self{
            url,
            http: reqwest::Client::new(),
        })
    }

    /// Create a client for the server set in [`config::API_URL`](crate::config::API_URL)
    pub fn from_config() -> Result<Self, url::ParseError> {
        Self::new(crate::config::api_url())
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Build the URL of an endpoint, e.g. `complete_task/3`
    fn endpoint(&self, path: &str) -> Result<Url, ViewError> {
        let mut base = self.url.clone();
        if base.path().ends_with('/') == false {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path)
            .map_err(|err| ViewError::Backend(format!("Invalid endpoint {}: {}", path, err)))
    }

    async fn check_status(response: Response) -> Result<Response, ViewError> {
        let status = response.status();
        if status.is_success() == false {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Unexpected HTTP status code {:?}: {}", status, body);
            return Err(ViewError::Status{ status: status.as_u16(), body });
        }
        Ok(response)
    }

    async fn read_task_reply(response: Response) -> Result<Task, ViewError> {
        let text = Self::check_status(response).await?.text().await?;
        let reply: TaskReply = serde_json::from_str(&text)?;
        log::debug!("Server replied {:?} (index {:?})", reply.message, reply.task_index);
        Ok(reply.task)
    }
}

#[async_trait]
impl TaskBackend for Client {
    async fn get_tasks(&mut self) -> Result<Vec<Task>, ViewError> {
        let url = self.endpoint("tasks")?;
        let response = self.http.get(url).send().await?;
        let text = Self::check_status(response).await?.text().await?;

        let list: TaskList = serde_json::from_str(&text)?;
        match list.tasks {
            None => Err(ViewError::MalformedPayload("the reply has no `tasks` array".to_string())),
            Some(tasks) => {
                log::debug!("Fetched {} tasks", tasks.len());
                Ok(tasks)
            },
        }
    }

    async fn add_task(&mut self, draft: &TaskDraft) -> Result<Task, ViewError> {
        let url = self.endpoint("add_task")?;
        let response = self.http.post(url).json(draft).send().await?;
        Self::read_task_reply(response).await
    }

    async fn update_task(&mut self, index: TaskIndex, task: &Task) -> Result<Task, ViewError> {
        let url = self.endpoint(&format!("update_task/{}", index))?;
        let response = self.http.post(url).json(task).send().await?;
        Self::read_task_reply(response).await
    }

    async fn complete_task(&mut self, index: TaskIndex) -> Result<(), ViewError> {
        let url = self.endpoint(&format!("complete_task/{}", index))?;
        let response = self.http.get(url).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn delete_task(&mut self, index: TaskIndex) -> Result<(), ViewError> {
        let url = self.endpoint(&format!("delete_task/{}", index))?;
        let response = self.http.get(url).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_built_from_the_base_url() {
        let client = Client::new("http://localhost:8080").unwrap();
        assert_eq!(client.endpoint("tasks").unwrap().as_str(), "http://localhost:8080/tasks");
        assert_eq!(client.endpoint("complete_task/3").unwrap().as_str(), "http://localhost:8080/complete_task/3");

        let client = Client::new("https://example.com/todo").unwrap();
        assert_eq!(client.endpoint("delete_task/0").unwrap().as_str(), "https://example.com/todo/delete_task/0");
    }

    #[test]
    fn task_list_without_tasks_is_detected() {
        let list: TaskList = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert!(list.tasks.is_none());
    }

    #[test]
    fn add_reply_is_parsed() {
        let text = r#"{"message": "Task added successfully", "task_index": 4,
                       "task": {"name": "a", "priority": "Low", "deadline": "", "details": "", "completed": false}}"#;
        let reply: TaskReply = serde_json::from_str(text).unwrap();
        assert_eq!(reply.task_index, Some(4));
        assert_eq!(reply.task.name(), "a");
    }
}
