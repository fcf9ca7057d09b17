mod splice;
