use super::API_PREFIX;

fn base_join(base: &str, path: &str) -> String {
    let b = base.trim_end_matches('/');
    let p = path.trim_start_matches('/');
    format!("{}/{}", b, p)
}

pub fn health(base: &str) -> String {
    base_join(base, &format!("{}/health", API_PREFIX))
}
pub fn children(base: &str) -> String {
    base_join(base, &format!("{}/children", API_PREFIX))
}
pub fn child(base: &str, id: i32) -> String {
    base_join(base, &format!("{}/children/{}", API_PREFIX, id))
}
pub fn sessions(base: &str) -> String {
    base_join(base, &format!("{}/sessions", API_PREFIX))
}
pub fn session(base: &str, id: i32) -> String {
    base_join(base, &format!("{}/sessions/{}", API_PREFIX, id))
}
pub fn activity_blocks(base: &str) -> String {
    base_join(base, &format!("{}/activity-blocks", API_PREFIX))
}
pub fn social_stories(base: &str) -> String {
    base_join(base, &format!("{}/social-stories", API_PREFIX))
}
pub fn visual_schedules(base: &str) -> String {
    base_join(base, &format!("{}/visual-schedules", API_PREFIX))
}
pub fn rewards(base: &str) -> String {
    base_join(base, &format!("{}/rewards", API_PREFIX))
}
pub fn rewards_redeem(base: &str) -> String {
    base_join(base, &format!("{}/rewards/redeem", API_PREFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_without_double_slashes() {
        assert_eq!(
            child("http://localhost:8080/", 7),
            "http://localhost:8080/api/children/7"
        );
        assert_eq!(
            rewards_redeem("http://h"),
            "http://h/api/rewards/redeem"
        );
    }
}
