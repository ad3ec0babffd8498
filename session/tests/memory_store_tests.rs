use session::model::Person;
use session::store::{Adapter, MemoryAdapter};

use fixtures::{far_future, from_now, sample_person, sample_session};

async fn seeded() -> (MemoryAdapter, Person) {
    let adapter = MemoryAdapter::new();
    let person = sample_person("person000000001");
    adapter.insert_person(person.clone()).await;
    (adapter, person)
}

#[tokio::test]
async fn unknown_session_yields_no_pair() -> anyhow::Result<()> {
    let (adapter, _) = seeded().await;
    assert_eq!(adapter.session_person_pair("missing").await?, None);
    Ok(())
}

#[tokio::test]
async fn set_then_lookup_returns_session_and_owner() -> anyhow::Result<()> {
    let (adapter, person) = seeded().await;
    let s = sample_session("s1", &person.id, from_now(10));

    adapter.set_session(&s).await?;

    assert_eq!(adapter.session_person_pair("s1").await?, Some((s, person)));
    Ok(())
}

#[tokio::test]
async fn set_session_replaces_existing_record() -> anyhow::Result<()> {
    let (adapter, person) = seeded().await;
    let mut s = sample_session("s1", &person.id, from_now(10));
    adapter.set_session(&s).await?;

    s.attributes.country = "de".into();
    adapter.set_session(&s).await?;

    assert_eq!(adapter.session_count().await, 1);
    assert_eq!(adapter.person_sessions(&person.id).await?, vec![s]);
    Ok(())
}

#[tokio::test]
async fn session_without_known_person_is_absent() -> anyhow::Result<()> {
    let adapter = MemoryAdapter::new();
    adapter
        .set_session(&sample_session("s1", "nobody", from_now(10)))
        .await?;

    assert_eq!(adapter.session_person_pair("s1").await?, None);
    Ok(())
}

#[tokio::test]
async fn person_sessions_are_ordered_by_expiration() -> anyhow::Result<()> {
    let (adapter, person) = seeded().await;
    let late = sample_session("a-late", &person.id, from_now(60));
    let early = sample_session("z-early", &person.id, from_now(30));
    adapter.set_session(&late).await?;
    adapter.set_session(&early).await?;

    assert_eq!(adapter.person_sessions(&person.id).await?, vec![early, late]);
    Ok(())
}

#[tokio::test]
async fn update_expiration_on_unknown_session_is_noop() -> anyhow::Result<()> {
    let (adapter, _) = seeded().await;
    adapter.update_session_expiration("missing", far_future()).await?;
    assert_eq!(adapter.session_count().await, 0);
    Ok(())
}

#[tokio::test]
async fn expired_purge_keeps_live_sessions() -> anyhow::Result<()> {
    let (adapter, person) = seeded().await;
    let live = sample_session("live", &person.id, from_now(10));
    adapter.set_session(&live).await?;
    adapter
        .set_session(&sample_session("dead", &person.id, from_now(-10)))
        .await?;

    adapter.delete_expired_sessions().await?;

    assert_eq!(adapter.person_sessions(&person.id).await?, vec![live]);
    Ok(())
}

#[tokio::test]
async fn delete_person_sessions_leaves_other_people_alone() -> anyhow::Result<()> {
    let (adapter, person) = seeded().await;
    let other = sample_person("person000000002");
    adapter.insert_person(other.clone()).await;

    adapter
        .set_session(&sample_session("mine", &person.id, from_now(10)))
        .await?;
    let theirs = sample_session("theirs", &other.id, from_now(10));
    adapter.set_session(&theirs).await?;

    adapter.delete_person_sessions(&person.id).await?;

    assert!(adapter.person_sessions(&person.id).await?.is_empty());
    assert_eq!(adapter.person_sessions(&other.id).await?, vec![theirs]);
    Ok(())
}
