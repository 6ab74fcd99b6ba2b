mod learner_props;
mod store_props;
