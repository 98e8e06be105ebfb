//! 密码哈希功能单元测试
//!
//! 测试 Argon2id 密码哈希和验证功能

use todo_service::auth::password::PasswordHasher;
use todo_service::error::AppError;

mod common;
use common::create_test_config;

fn test_hasher() -> PasswordHasher {
    PasswordHasher::from_config(&create_test_config().security).unwrap()
}

#[test]
fn test_hash_and_verify() {
    let hasher = test_hasher();
    let hash = hasher.hash("TestPassword123!").unwrap();

    assert!(hasher.verify("TestPassword123!", &hash));
}

#[test]
fn test_verify_fails_with_wrong_password() {
    let hasher = test_hasher();
    let hash = hasher.hash("TestPassword123!").unwrap();

    assert!(!hasher.verify("WrongPassword", &hash));
}

#[test]
fn test_hash_is_different_each_time() {
    let hasher = test_hasher();

    let hash1 = hasher.hash("TestPassword123!").unwrap();
    let hash2 = hasher.hash("TestPassword123!").unwrap();

    // 随机盐，哈希不同但都能验证
    assert_ne!(hash1, hash2);
    assert!(hasher.verify("TestPassword123!", &hash1));
    assert!(hasher.verify("TestPassword123!", &hash2));
}

#[test]
fn test_hash_does_not_contain_plaintext() {
    let hash = test_hasher().hash("plaintext-secret").unwrap();
    assert!(!hash.contains("plaintext-secret"));
}

#[test]
fn test_verify_against_hash_from_other_params() {
    // PHC 字符串自带参数，不同参数的哈希器也能验证
    let strong = PasswordHasher::with_params(16, 2, 1).unwrap();
    let hash = strong.hash("secret").unwrap();

    assert!(test_hasher().verify("secret", &hash));
}

#[test]
fn test_malformed_hash() {
    assert!(!test_hasher().verify("secret", ""));
    assert!(!test_hasher().verify("secret", "$argon2id$broken"));
}

#[test]
fn test_password_policy_validation() {
    let mut config = create_test_config();
    config.security.password_min_length = 8;

    assert!(PasswordHasher::validate_password_policy("12345678", &config.security).is_ok());
    assert!(matches!(
        PasswordHasher::validate_password_policy("1234567", &config.security),
        Err(AppError::Validation(_))
    ));
}
