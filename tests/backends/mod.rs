pub mod foundation_apitest;
