use crate::test_helpers::factories::CrushSpecFactory;
use crate::test_helpers::factory::Factory;

#[cfg(test)]
#[test]
fn test_crush_spec_factory() {
    let config = Factory::crush_spec()
        .with("regex", ".+/dir")
        .with("output_codec", "sequence")
        .create();

    assert_eq!(config.regex.as_deref(), Some(".+/dir"));
    assert_eq!(config.input_codec.as_deref(), Some("text"));
    assert_eq!(config.output_codec.as_deref(), Some("sequence"));

    let cleared = Factory::crush_spec().with("replacement", "").create();
    assert!(cleared.replacement.is_none());

    let specs = CrushSpecFactory::compile(&[config]);
    assert_eq!(specs.len(), 1);
}
